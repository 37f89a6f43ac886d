//! Error types for the consensus engine

use std::str::FromStr;

use super::ConsensusMethod;

/// Consensus error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConsensusError {
    #[error("Consensus request has no opinions")]
    EmptyInput,

    #[error("Confidence out of range for {participant}: {value}")]
    InvalidConfidence { participant: String, value: f64 },

    #[error("Requirement {field} out of range: {value}")]
    InvalidRequirement { field: &'static str, value: f64 },

    #[error("No consensus could be reached: {0}")]
    NoConsensus(String),

    #[error("Unknown consensus strategy: {0}")]
    UnknownStrategy(String),
}

/// Result type for consensus operations
pub type EngineResult<T> = Result<T, ConsensusError>;

impl FromStr for ConsensusMethod {
    type Err = ConsensusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConsensusMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ConsensusError::UnknownStrategy(s.to_string()))
    }
}

impl ConsensusMethod {
    /// Parse a strategy name; unknown names resolve to weighted-majority.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|e: ConsensusError| {
            tracing::warn!(error = %e, "[ar-01] Falling back to weighted-majority");
            ConsensusMethod::WeightedMajority
        })
    }
}
