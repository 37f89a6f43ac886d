//! Error types for the conflict resolver

use std::str::FromStr;

use super::ResolutionMethod;

/// Resolution error types
///
/// None of these reach callers of `resolve_conflict`; the service turns
/// them into escalation resolutions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolutionError {
    #[error("Conflict has no positions")]
    EmptyInput,

    #[error("No position is eligible for arbitration")]
    NoValidPosition,

    #[error("{field} out of range for {participant}: {value}")]
    InvalidPosition {
        participant: String,
        field: &'static str,
        value: f64,
    },

    #[error("Unknown resolution strategy: {0}")]
    UnknownStrategy(String),
}

/// Result type for resolution operations
pub type ResolutionResult<T> = Result<T, ResolutionError>;

impl FromStr for ResolutionMethod {
    type Err = ResolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResolutionMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ResolutionError::UnknownStrategy(s.to_string()))
    }
}

impl ResolutionMethod {
    /// Parse a method name; unknown names resolve to mediation.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|e: ResolutionError| {
            tracing::warn!(error = %e, "[ar-02] Falling back to mediation");
            ResolutionMethod::Mediation
        })
    }
}
