//! # Consensus Flows
//!
//! ar-01 publishing onto a real bus with subscribers on each topic.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;
    use tokio_stream::StreamExt;

    use ar_01_consensus::{
        ConsensusApi, ConsensusDependencies, ConsensusMethod, ConsensusRequest, ConsensusService,
        Opinion,
    };
    use shared_bus::{ArbitrationEvent, EventFilter, EventTopic, InMemoryEventBus};
    use shared_types::{Evidence, EvidenceKind, EvidenceStrength, Stance};

    fn line_length_request() -> ConsensusRequest {
        ConsensusRequest::new(
            "max-line-length",
            vec![
                Opinion::new("a", 80, 0.9),
                Opinion::new("b", 80, 0.8),
                Opinion::new("c", 120, 0.6),
            ],
        )
    }

    fn service(bus: &Arc<InMemoryEventBus>) -> ConsensusService<InMemoryEventBus> {
        ConsensusService::new(ConsensusDependencies::with_publisher(bus.clone()))
    }

    #[tokio::test]
    async fn test_line_length_decision_reaches_subscribers() {
        let bus = Arc::new(InMemoryEventBus::new());
        let mut consensus_sub = bus.subscribe(EventFilter::topics(vec![EventTopic::Consensus]));
        let mut trust_sub = bus.subscribe(EventFilter::topics(vec![EventTopic::Trust]));
        let service = service(&bus);

        let result = service
            .reach_consensus_with(line_length_request(), ConsensusMethod::WeightedMajority)
            .await
            .unwrap();
        assert_eq!(result.final_value, Stance::Numeric(80.0));
        assert_eq!(result.dissenters.len(), 1);
        assert_eq!(result.dissenters[0].participant, "c");

        let consensus_events = consensus_sub.drain();
        assert_eq!(consensus_events.len(), 2);
        match &consensus_events[1] {
            ArbitrationEvent::ConsensusReached {
                topic, dissenters, ..
            } => {
                assert_eq!(topic, "max-line-length");
                assert_eq!(dissenters, &vec!["c".to_string()]);
            }
            other => panic!("unexpected event {other:?}"),
        }

        let trust_events = trust_sub.drain();
        assert_eq!(trust_events.len(), 1);
        assert!(matches!(
            &trust_events[0],
            ArbitrationEvent::TrustAdjusted { adjustments, .. } if adjustments.len() == 3
        ));
    }

    #[tokio::test]
    async fn test_trust_drifts_across_requests() {
        let bus = Arc::new(InMemoryEventBus::new());
        let service = service(&bus);

        for _ in 0..3 {
            service
                .reach_consensus_with(line_length_request(), ConsensusMethod::WeightedMajority)
                .await
                .unwrap();
        }

        assert!((service.trust("a").await - 1.02_f64.powi(3)).abs() < 1e-9);
        assert!((service.trust("c").await - 0.98_f64.powi(3)).abs() < 1e-9);
        assert_eq!(service.history().await.len(), 3);
    }

    #[tokio::test]
    async fn test_seeded_security_expert_leads() {
        let bus = Arc::new(InMemoryEventBus::new());
        let service = service(&bus);

        let request = ConsensusRequest::new(
            "sql-injection-risk",
            vec![
                Opinion::new("security-scanner", "block", 0.9).with_evidence(Evidence::new(
                    EvidenceKind::Empirical,
                    EvidenceStrength::Strong,
                    "taint-analysis",
                )),
                Opinion::new("style-linter", "allow", 0.6),
                Opinion::new("performance-analyzer", "allow", 0.5),
            ],
        )
        .with_domain("security");

        let result = service.reach_consensus(request).await.unwrap();
        assert_eq!(result.final_value, Stance::from("block"));
    }

    #[tokio::test]
    async fn test_failed_request_streams_failure_event() {
        let bus = Arc::new(InMemoryEventBus::new());
        let mut stream = bus
            .subscribe(EventFilter::topics(vec![EventTopic::Consensus]))
            .into_stream();
        let service = service(&bus);

        let err = service
            .reach_consensus(ConsensusRequest::new("nothing", vec![]))
            .await;
        assert!(err.is_err());

        let event = timeout(Duration::from_secs(1), stream.next())
            .await
            .expect("timed out waiting for event")
            .expect("stream closed");
        assert!(matches!(
            event,
            ArbitrationEvent::ConsensusFailed { ref topic, .. } if topic == "nothing"
        ));
    }
}
