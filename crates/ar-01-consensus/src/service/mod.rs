//! Consensus Service - Core business logic
//!
//! # Flow
//! validate → capture weight snapshot → select strategy → run →
//! trust update → history → metrics → events
//!
//! Events are fire-and-forget. A bus without subscribers changes nothing.

use crate::domain::{
    run_strategy, select_method, ConsensusConfig, ConsensusError, ConsensusMethod,
    ConsensusMetrics, ConsensusRequest, ConsensusResult, EngineResult, WeightContext,
};
use crate::metrics;
use crate::ports::{ConsensusApi, EventPublisher};
use crate::state::ConsensusState;
use crate::validation::RequestValidator;
use async_trait::async_trait;
use shared_bus::ArbitrationEvent;
use shared_types::{ParticipantRegistry, TrustTracker};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Consensus Service
pub struct ConsensusService<P>
where
    P: EventPublisher,
{
    publisher: Arc<P>,
    registry: Arc<ParticipantRegistry>,
    trust: Arc<TrustTracker>,
    state: Arc<ConsensusState>,
    config: ConsensusConfig,
}

/// Dependencies for ConsensusService
pub struct ConsensusDependencies<P> {
    pub publisher: Arc<P>,
    pub registry: Arc<ParticipantRegistry>,
    pub trust: Arc<TrustTracker>,
    pub config: ConsensusConfig,
}

impl<P> ConsensusDependencies<P> {
    /// Seeded registry, fresh trust tracker, default config.
    pub fn with_publisher(publisher: Arc<P>) -> Self {
        Self {
            publisher,
            registry: Arc::new(ParticipantRegistry::with_seed()),
            trust: Arc::new(TrustTracker::new()),
            config: ConsensusConfig::default(),
        }
    }
}

impl<P> ConsensusService<P>
where
    P: EventPublisher,
{
    /// Create a new ConsensusService
    pub fn new(deps: ConsensusDependencies<P>) -> Self {
        let state = Arc::new(ConsensusState::new(deps.config.history_capacity));
        Self {
            publisher: deps.publisher,
            registry: deps.registry,
            trust: deps.trust,
            state,
            config: deps.config,
        }
    }

    pub fn registry(&self) -> &Arc<ParticipantRegistry> {
        &self.registry
    }

    pub fn trust_tracker(&self) -> &Arc<TrustTracker> {
        &self.trust
    }

    pub fn config(&self) -> &ConsensusConfig {
        &self.config
    }

    async fn decide(
        &self,
        request: ConsensusRequest,
        method: Option<ConsensusMethod>,
    ) -> EngineResult<ConsensusResult> {
        let started = Instant::now();

        if let Err(e) = RequestValidator::validate(&request) {
            warn!(topic = %request.topic, error = %e, "[ar-01] Rejected consensus request");
            return Err(self.fail(&request.topic, e).await);
        }

        let ctx = WeightContext::capture(&self.registry, &self.trust);
        let method = method.unwrap_or_else(|| select_method(&request, &ctx, &self.config));
        info!(
            topic = %request.topic,
            method = %method,
            opinions = request.opinions.len(),
            "[ar-01] Reaching consensus"
        );
        self.publisher
            .publish(ArbitrationEvent::ConsensusStarted {
                topic: request.topic.clone(),
                method: method.to_string(),
                opinions: request.opinions.len(),
            })
            .await;

        let mut result = match run_strategy(method, &request, &ctx, &self.config) {
            Ok(result) => result,
            Err(e) => {
                warn!(topic = %request.topic, method = %method, error = %e, "[ar-01] Strategy failed");
                return Err(self.fail(&request.topic, e).await);
            }
        };
        result.duration = started.elapsed();

        let adjustments = self.trust.apply_outcome(
            request
                .opinions
                .iter()
                .map(|o| (o.participant.as_str(), !result.dissented(&o.participant))),
        );
        debug!(topic = %request.topic, adjusted = adjustments.len(), "[ar-01] Trust updated");

        self.state.record(result.clone());
        metrics::record_decision(
            result.method.as_str(),
            result.agreement_level,
            result.dissenters.len(),
            result.duration.as_secs_f64(),
        );

        info!(
            topic = %result.topic,
            method = %result.method,
            value = %result.final_value,
            agreement = result.agreement_level,
            confidence = result.confidence,
            dissenters = result.dissenters.len(),
            "[ar-01] Consensus reached"
        );

        self.publisher
            .publish(ArbitrationEvent::TrustAdjusted {
                topic: result.topic.clone(),
                adjustments,
            })
            .await;
        self.publisher
            .publish(ArbitrationEvent::ConsensusReached {
                topic: result.topic.clone(),
                method: result.method.to_string(),
                final_value: result.final_value.clone(),
                agreement: result.agreement_level,
                confidence: result.confidence,
                dissenters: result
                    .dissenters
                    .iter()
                    .map(|d| d.participant.clone())
                    .collect(),
            })
            .await;

        Ok(result)
    }

    async fn fail(&self, topic: &str, error: ConsensusError) -> ConsensusError {
        metrics::record_failure();
        self.publisher
            .publish(ArbitrationEvent::ConsensusFailed {
                topic: topic.to_string(),
                reason: error.to_string(),
            })
            .await;
        error
    }
}

#[async_trait]
impl<P> ConsensusApi for ConsensusService<P>
where
    P: EventPublisher,
{
    async fn reach_consensus(&self, request: ConsensusRequest) -> EngineResult<ConsensusResult> {
        self.decide(request, None).await
    }

    async fn reach_consensus_with(
        &self,
        request: ConsensusRequest,
        method: ConsensusMethod,
    ) -> EngineResult<ConsensusResult> {
        self.decide(request, Some(method)).await
    }

    async fn consensus_metrics(&self) -> ConsensusMetrics {
        self.state.metrics()
    }

    async fn history(&self) -> Vec<ConsensusResult> {
        self.state.history()
    }

    async fn trust(&self, participant: &str) -> f64 {
        self.trust.trust(participant)
    }
}
