//! # Conflict Resolution Metrics
//!
//! Enable with the `metrics` feature.
//!
//! - `arbiter_conflicts_resolved_total` - Counter of resolutions (by method)
//! - `arbiter_conflicts_escalated_total` - Counter of escalations
//! - `arbiter_mediation_rounds_total` - Counter of mediation rounds run

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_counter_vec, register_int_counter, CounterVec, IntCounter};

#[cfg(feature = "metrics")]
lazy_static! {
    pub static ref RESOLVED: CounterVec = register_counter_vec!(
        "arbiter_conflicts_resolved_total",
        "Total number of conflict resolutions",
        &["method"]
    )
    .expect("Failed to create RESOLVED metric");

    pub static ref ESCALATED: IntCounter = register_int_counter!(
        "arbiter_conflicts_escalated_total",
        "Total number of escalated conflicts"
    )
    .expect("Failed to create ESCALATED metric");

    pub static ref MEDIATION_ROUNDS: IntCounter = register_int_counter!(
        "arbiter_mediation_rounds_total",
        "Total number of mediation rounds run"
    )
    .expect("Failed to create MEDIATION_ROUNDS metric");
}

#[cfg(feature = "metrics")]
pub fn record_resolution(method: &str, escalated: bool) {
    RESOLVED.with_label_values(&[method]).inc();
    if escalated {
        ESCALATED.inc();
    }
}

#[cfg(feature = "metrics")]
pub fn record_mediation_rounds(rounds: u8) {
    MEDIATION_ROUNDS.inc_by(u64::from(rounds));
}

#[cfg(not(feature = "metrics"))]
pub fn record_resolution(_method: &str, _escalated: bool) {}

#[cfg(not(feature = "metrics"))]
pub fn record_mediation_rounds(_rounds: u8) {}
