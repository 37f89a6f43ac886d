//! Driving ports (API - Inbound)

use crate::domain::{
    ConsensusMethod, ConsensusMetrics, ConsensusRequest, ConsensusResult, EngineResult,
};
use async_trait::async_trait;

/// Primary consensus API.
///
/// Computation is synchronous; the methods are async so callers can treat
/// the engine like any other service on the runtime.
#[async_trait]
pub trait ConsensusApi: Send + Sync {
    /// Decide `request` with an automatically selected strategy.
    ///
    /// # Errors
    /// * `EmptyInput` when the request carries no opinions
    /// * `InvalidConfidence` / `InvalidRequirement` for out-of-range inputs
    async fn reach_consensus(&self, request: ConsensusRequest) -> EngineResult<ConsensusResult>;

    /// Decide `request` with an explicitly chosen strategy.
    async fn reach_consensus_with(
        &self,
        request: ConsensusRequest,
        method: ConsensusMethod,
    ) -> EngineResult<ConsensusResult>;

    /// Aggregates over the retained history.
    async fn consensus_metrics(&self) -> ConsensusMetrics;

    /// Retained results, oldest first.
    async fn history(&self) -> Vec<ConsensusResult>;

    /// Current trust multiplier for a participant.
    async fn trust(&self, participant: &str) -> f64;
}
