//! # Conflict Flows
//!
//! ar-02 publishing onto a real bus: mediation progress, resolution and
//! escalation as seen by independent subscribers.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ar_02_conflict_resolution::{
        Conflict, ConflictKind, ConflictResolutionApi, ConflictResolver, Position,
        ResolutionMethod, ResolverDependencies, Severity,
    };
    use shared_bus::{
        ArbitrationEvent, EventFilter, EventTopic, InMemoryEventBus, CONFLICT_RESOLVER,
    };
    use shared_types::{Evidence, EvidenceKind, EvidenceStrength, Stance};

    fn resolver(bus: &Arc<InMemoryEventBus>) -> ConflictResolver<InMemoryEventBus> {
        ConflictResolver::new(ResolverDependencies::with_publisher(bus.clone()))
    }

    #[tokio::test]
    async fn test_mediation_rounds_reach_mediation_subscribers() {
        let bus = Arc::new(InMemoryEventBus::new());
        let mut mediation_sub = bus.subscribe(EventFilter::topics(vec![EventTopic::Mediation]));
        let mut conflict_sub = bus.subscribe(EventFilter::topics(vec![EventTopic::Conflict]));
        let resolver = resolver(&bus);

        let conflict = Conflict::new(
            "module-boundary",
            ConflictKind::Scope,
            vec![Position::new("a", "split", 0.9), Position::new("b", "merge", 0.9)],
        )
        .with_id("c-scope");
        let resolution = resolver
            .resolve_conflict_with(conflict, ResolutionMethod::Mediation)
            .await;
        assert!(resolution.is_escalated());

        let rounds: Vec<u8> = mediation_sub
            .drain()
            .into_iter()
            .filter_map(|event| match event {
                ArbitrationEvent::MediationRoundCompleted { round, .. } => Some(round),
                _ => None,
            })
            .collect();
        assert_eq!(rounds, vec![1, 2, 3, 4, 5]);

        let names: Vec<&str> = conflict_sub.drain().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["conflict:started", "conflict:escalated"]);
    }

    #[tokio::test]
    async fn test_evidence_backed_position_wins_prediction() {
        let bus = Arc::new(InMemoryEventBus::new());
        let resolver = resolver(&bus);

        let conflict = Conflict::new(
            "load-forecast",
            ConflictKind::Prediction,
            vec![
                Position::new("performance-analyzer", "scale-up", 0.8).with_evidence(
                    Evidence::new(EvidenceKind::Empirical, EvidenceStrength::Strong, "load-test"),
                ),
                Position::new("architecture-reviewer", "hold", 0.8),
            ],
        );
        let resolution = resolver.resolve_conflict(conflict).await;
        assert_eq!(resolution.method, ResolutionMethod::EvidenceEvaluation);
        assert_eq!(resolution.decided(), Some(&Stance::from("scale-up")));
    }

    #[tokio::test]
    async fn test_engine_filter_only_sees_resolver_events() {
        let bus = Arc::new(InMemoryEventBus::new());
        let mut sub = bus.subscribe(EventFilter::from_engines(vec![CONFLICT_RESOLVER]));
        let resolver = resolver(&bus);

        let conflict = Conflict::new(
            "release-window",
            ConflictKind::Priority,
            vec![Position::new("a", "friday", 0.4), Position::new("b", "monday", 0.7)],
        )
        .with_severity(Severity::Critical);
        let resolution = resolver.resolve_conflict(conflict).await;
        assert_eq!(resolution.method, ResolutionMethod::Arbitration);

        let events = sub.drain();
        assert!(!events.is_empty());
        assert!(events.iter().all(|e| e.source_engine() == CONFLICT_RESOLVER));
    }

    #[tokio::test]
    async fn test_statistics_across_methods() {
        let bus = Arc::new(InMemoryEventBus::new());
        let resolver = resolver(&bus);

        for method in [
            ResolutionMethod::Voting,
            ResolutionMethod::Partition,
            ResolutionMethod::Deferral,
        ] {
            let conflict = Conflict::new(
                "naming",
                ConflictKind::Scope,
                vec![Position::new("a", "x", 0.5), Position::new("b", "y", 0.5)],
            );
            resolver.resolve_conflict_with(conflict, method).await;
        }

        let stats = resolver.statistics().await;
        assert_eq!(stats.total_resolutions, 3);
        assert_eq!(stats.method_distribution.len(), 3);
        assert_eq!(stats.escalation_rate, 0.0);
    }
}
