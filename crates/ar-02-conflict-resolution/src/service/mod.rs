//! Conflict Resolver - Core business logic
//!
//! # Flow
//! validate → select method → run strategy → history → metrics → events
//!
//! Every failure on the way becomes an escalation resolution; callers
//! always get a `Resolution` back.

use crate::domain::{
    escalation, run_strategy, select_method, Conflict, Resolution, ResolutionContext,
    ResolutionMethod, ResolutionOutcome, ResolutionResult, ResolutionStatistics, ResolverConfig,
};
use crate::metrics;
use crate::ports::{ConflictResolutionApi, EventPublisher};
use crate::state::ResolverState;
use crate::validation::ConflictValidator;
use async_trait::async_trait;
use shared_bus::ArbitrationEvent;
use shared_types::ParticipantRegistry;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Conflict Resolver
pub struct ConflictResolver<P>
where
    P: EventPublisher,
{
    publisher: Arc<P>,
    registry: Arc<ParticipantRegistry>,
    state: Arc<ResolverState>,
    config: ResolverConfig,
}

/// Dependencies for ConflictResolver
pub struct ResolverDependencies<P> {
    pub publisher: Arc<P>,
    pub registry: Arc<ParticipantRegistry>,
    pub config: ResolverConfig,
}

impl<P> ResolverDependencies<P> {
    /// Seeded registry, default config.
    pub fn with_publisher(publisher: Arc<P>) -> Self {
        Self {
            publisher,
            registry: Arc::new(ParticipantRegistry::with_seed()),
            config: ResolverConfig::default(),
        }
    }
}

impl<P> ConflictResolver<P>
where
    P: EventPublisher,
{
    pub fn new(deps: ResolverDependencies<P>) -> Self {
        let state = Arc::new(ResolverState::new(deps.config.history_capacity));
        Self {
            publisher: deps.publisher,
            registry: deps.registry,
            state,
            config: deps.config,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ParticipantRegistry> {
        &self.registry
    }

    async fn resolve(&self, conflict: Conflict, method: Option<ResolutionMethod>) -> Resolution {
        let started = Instant::now();

        let mut resolution = match ConflictValidator::validate(&conflict) {
            Err(e) => {
                warn!(conflict_id = %conflict.id, error = %e, "[ar-02] Rejected conflict");
                escalation(&conflict, &e.to_string())
            }
            Ok(()) => {
                let method = method.unwrap_or_else(|| select_method(&conflict, &self.config));
                info!(
                    conflict_id = %conflict.id,
                    topic = %conflict.topic,
                    kind = %conflict.kind,
                    severity = %conflict.severity,
                    method = %method,
                    "[ar-02] Resolving conflict"
                );
                self.publisher
                    .publish(ArbitrationEvent::ConflictStarted {
                        conflict_id: conflict.id.clone(),
                        topic: conflict.topic.clone(),
                        kind: conflict.kind.to_string(),
                        severity: conflict.severity.to_string(),
                        positions: conflict.positions.len(),
                    })
                    .await;

                let ctx = ResolutionContext::capture(&self.config, &self.registry);
                run_guarded(&conflict, method, || run_strategy(method, &conflict, &ctx))
            }
        };
        resolution.duration = started.elapsed();

        if let Some(report) = &resolution.mediation {
            for snapshot in &report.rounds {
                debug!(
                    conflict_id = %conflict.id,
                    round = snapshot.round,
                    agreement = snapshot.agreement,
                    "[ar-02] Mediation round"
                );
                self.publisher
                    .publish(ArbitrationEvent::MediationRoundCompleted {
                        conflict_id: conflict.id.clone(),
                        round: snapshot.round,
                        agreement: snapshot.agreement,
                    })
                    .await;
            }
            metrics::record_mediation_rounds(report.rounds_run());
        }

        self.state.record(resolution.clone());
        metrics::record_resolution(resolution.method.as_str(), resolution.is_escalated());

        match &resolution.outcome {
            Some(ResolutionOutcome::Escalated { reason, .. }) => {
                warn!(conflict_id = %conflict.id, reason = %reason, "[ar-02] Conflict escalated");
                self.publisher
                    .publish(ArbitrationEvent::ConflictEscalated {
                        conflict_id: conflict.id.clone(),
                        reason: reason.clone(),
                    })
                    .await;
            }
            _ => {
                info!(
                    conflict_id = %conflict.id,
                    method = %resolution.method,
                    agreement = resolution.agreement_level,
                    confidence = resolution.confidence,
                    "[ar-02] Conflict resolved"
                );
                self.publisher
                    .publish(ArbitrationEvent::ConflictResolved {
                        conflict_id: conflict.id.clone(),
                        method: resolution.method.to_string(),
                        agreement: resolution.agreement_level,
                        confidence: resolution.confidence,
                    })
                    .await;
            }
        }

        resolution
    }
}

/// Run a strategy, turning both errors and panics into escalations.
fn run_guarded<F>(conflict: &Conflict, method: ResolutionMethod, run: F) -> Resolution
where
    F: FnOnce() -> ResolutionResult<Resolution>,
{
    match panic::catch_unwind(AssertUnwindSafe(run)) {
        Ok(Ok(resolution)) => resolution,
        Ok(Err(e)) => {
            warn!(
                conflict_id = %conflict.id,
                method = %method,
                error = %e,
                "[ar-02] Strategy failed, escalating"
            );
            escalation(conflict, &format!("{method} failed: {e}"))
        }
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            error!(
                conflict_id = %conflict.id,
                method = %method,
                panic = %message,
                "[ar-02] Strategy panicked, escalating"
            );
            escalation(conflict, &format!("{method} panicked: {message}"))
        }
    }
}

#[async_trait]
impl<P> ConflictResolutionApi for ConflictResolver<P>
where
    P: EventPublisher,
{
    async fn resolve_conflict(&self, conflict: Conflict) -> Resolution {
        self.resolve(conflict, None).await
    }

    async fn resolve_conflict_with(
        &self,
        conflict: Conflict,
        method: ResolutionMethod,
    ) -> Resolution {
        self.resolve(conflict, Some(method)).await
    }

    async fn statistics(&self) -> ResolutionStatistics {
        self.state.statistics()
    }

    async fn history(&self) -> Vec<Resolution> {
        self.state.history()
    }
}
