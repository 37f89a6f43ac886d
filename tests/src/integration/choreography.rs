//! # Consensus → Conflict Choreography
//!
//! A watcher task listens for `ConsensusReached` events and flags topics
//! whose agreement is too low to act on. Flagged topics are reopened as
//! conflicts on ar-02. Neither engine knows about the other; the bus is the
//! only link.

use ar_01_consensus::ConsensusRequest;
use ar_02_conflict_resolution::{Conflict, ConflictKind, Position};
use shared_bus::{ArbitrationEvent, EventStream};
use tokio::sync::mpsc;
use tokio_stream::StreamExt;

/// Agreement below which a decision is reopened as a conflict.
pub const REOPEN_BELOW: f64 = 0.6;

/// Forward the topic of every weak consensus to `flagged`.
pub async fn watch_weak_consensus(mut events: EventStream, flagged: mpsc::Sender<String>) {
    while let Some(event) = events.next().await {
        if let ArbitrationEvent::ConsensusReached {
            topic, agreement, ..
        } = event
        {
            if agreement < REOPEN_BELOW && flagged.send(topic).await.is_err() {
                break;
            }
        }
    }
}

/// Reopen a consensus request as a conflict, one position per opinion.
pub fn reopen_as_conflict(request: &ConsensusRequest, kind: ConflictKind) -> Conflict {
    let positions = request
        .opinions
        .iter()
        .map(|op| {
            let mut position = Position::new(op.participant.clone(), op.value.clone(), op.confidence);
            for item in &op.evidence {
                position = position.with_evidence(item.clone());
            }
            position
        })
        .collect();
    let conflict = Conflict::new(request.topic.clone(), kind, positions);
    match &request.domain {
        Some(domain) => conflict.with_domain(domain.clone()),
        None => conflict,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    use ar_01_consensus::{
        ConsensusApi, ConsensusDependencies, ConsensusMethod, ConsensusService, Opinion,
    };
    use ar_02_conflict_resolution::{
        ConflictResolutionApi, ConflictResolver, ResolutionMethod, ResolverDependencies,
    };
    use arbiter_telemetry::TelemetryConfig;
    use shared_bus::{EventFilter, EventTopic, InMemoryEventBus};
    use shared_types::{ParticipantRegistry, Stance, TrustTracker};

    struct Harness {
        bus: Arc<InMemoryEventBus>,
        consensus: ConsensusService<InMemoryEventBus>,
        resolver: ConflictResolver<InMemoryEventBus>,
    }

    fn harness() -> Harness {
        let bus = Arc::new(InMemoryEventBus::new());
        let registry = Arc::new(ParticipantRegistry::with_seed());
        let consensus = ConsensusService::new(ConsensusDependencies {
            publisher: bus.clone(),
            registry: registry.clone(),
            trust: Arc::new(TrustTracker::new()),
            config: Default::default(),
        });
        let resolver = ConflictResolver::new(ResolverDependencies {
            publisher: bus.clone(),
            registry,
            config: Default::default(),
        });
        Harness {
            bus,
            consensus,
            resolver,
        }
    }

    fn indentation_request() -> ConsensusRequest {
        ConsensusRequest::new(
            "indentation",
            vec![Opinion::new("a", "tabs", 0.8), Opinion::new("b", "spaces", 0.8)],
        )
    }

    #[tokio::test]
    async fn test_weak_consensus_is_reopened_and_resolved() {
        let _ = arbiter_telemetry::init_telemetry(&TelemetryConfig {
            console_output: false,
            ..TelemetryConfig::from_env()
        });

        let h = harness();
        let stream = h
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Consensus]))
            .into_stream();
        let (tx, mut rx) = mpsc::channel(8);
        let watcher = tokio::spawn(watch_weak_consensus(stream, tx));

        let request = indentation_request();
        let decision = h
            .consensus
            .reach_consensus_with(request.clone(), ConsensusMethod::WeightedMajority)
            .await
            .unwrap();
        assert!(decision.agreement_level < REOPEN_BELOW);

        let flagged = timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("watcher did not flag the topic")
            .expect("watcher channel closed");
        assert_eq!(flagged, "indentation");

        let mut conflict_sub = h.bus.subscribe(EventFilter::topics(vec![EventTopic::Conflict]));
        let conflict = reopen_as_conflict(&request, ConflictKind::Methodology).with_id("c-indent");
        let resolution = h
            .resolver
            .resolve_conflict_with(conflict, ResolutionMethod::Voting)
            .await;
        assert_eq!(resolution.decided(), Some(&Stance::from("tabs")));

        let events = conflict_sub.drain();
        assert!(matches!(
            events.last(),
            Some(ArbitrationEvent::ConflictResolved { conflict_id, .. }) if conflict_id == "c-indent"
        ));

        watcher.abort();
    }

    #[tokio::test]
    async fn test_strong_consensus_is_not_flagged() {
        let h = harness();
        let stream = h
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Consensus]))
            .into_stream();
        let (tx, mut rx) = mpsc::channel(8);
        let watcher = tokio::spawn(watch_weak_consensus(stream, tx));

        let request = ConsensusRequest::new(
            "trailing-commas",
            vec![Opinion::new("a", true, 0.9), Opinion::new("b", true, 0.7)],
        );
        let decision = h.consensus.reach_consensus(request).await.unwrap();
        assert_eq!(decision.agreement_level, 1.0);

        assert!(timeout(Duration::from_millis(100), rx.recv()).await.is_err());
        watcher.abort();
    }

    #[test]
    fn test_reopen_carries_domain_and_confidence() {
        let request = indentation_request().with_domain("style");
        let conflict = reopen_as_conflict(&request, ConflictKind::Methodology);
        assert_eq!(conflict.domain.as_deref(), Some("style"));
        assert_eq!(conflict.positions.len(), 2);
        assert_eq!(conflict.positions[1].confidence, 0.8);
        assert_eq!(conflict.participants.len(), 2);
    }
}
