//! # Consensus Metrics
//!
//! Prometheus metrics for the consensus engine.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! ar-01-consensus = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `arbiter_consensus_decisions_total` - Counter of decisions (by method)
//! - `arbiter_consensus_failures_total` - Counter of rejected or undecided requests
//! - `arbiter_consensus_dissenters_total` - Counter of dissenting opinions
//! - `arbiter_consensus_last_agreement` - Gauge of the latest agreement level
//! - `arbiter_consensus_duration_seconds` - Histogram of decision latency

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_counter_vec, register_gauge, register_histogram, register_int_counter, CounterVec,
    Gauge, Histogram, IntCounter,
};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Decisions, labeled by method
    pub static ref DECISIONS: CounterVec = register_counter_vec!(
        "arbiter_consensus_decisions_total",
        "Total number of consensus decisions",
        &["method"]
    )
    .expect("Failed to create DECISIONS metric");

    /// Requests that produced no decision
    pub static ref FAILURES: IntCounter = register_int_counter!(
        "arbiter_consensus_failures_total",
        "Total number of consensus requests without a decision"
    )
    .expect("Failed to create FAILURES metric");

    /// Dissenting opinions across all decisions
    pub static ref DISSENTERS: IntCounter = register_int_counter!(
        "arbiter_consensus_dissenters_total",
        "Total number of dissenting opinions"
    )
    .expect("Failed to create DISSENTERS metric");

    /// Agreement level of the latest decision
    pub static ref LAST_AGREEMENT: Gauge = register_gauge!(
        "arbiter_consensus_last_agreement",
        "Agreement level of the most recent decision"
    )
    .expect("Failed to create LAST_AGREEMENT metric");

    /// Decision latency
    pub static ref DURATION: Histogram = register_histogram!(
        "arbiter_consensus_duration_seconds",
        "Time spent deciding a consensus request"
    )
    .expect("Failed to create DURATION metric");
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

/// Record a decision
#[cfg(feature = "metrics")]
pub fn record_decision(method: &str, agreement: f64, dissenters: usize, seconds: f64) {
    DECISIONS.with_label_values(&[method]).inc();
    DISSENTERS.inc_by(dissenters as u64);
    LAST_AGREEMENT.set(agreement);
    DURATION.observe(seconds);
}

/// Record a request that produced no decision
#[cfg(feature = "metrics")]
pub fn record_failure() {
    FAILURES.inc();
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_decision(_method: &str, _agreement: f64, _dissenters: usize, _seconds: f64) {}

#[cfg(not(feature = "metrics"))]
pub fn record_failure() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_noop_when_disabled() {
        record_decision("weighted-majority", 0.74, 1, 0.001);
        record_failure();
    }
}
