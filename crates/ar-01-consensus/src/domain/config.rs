//! Consensus engine configuration

use serde::{Deserialize, Serialize};

/// Tunables for strategy selection and the individual strategies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusConfig {
    /// `minimum_agreement` above this selects unanimous.
    pub unanimous_threshold: f64,
    /// A specialization above this selects expert-led.
    pub expert_selection_threshold: f64,
    /// Time budgets below this (ms) select weighted-majority.
    pub fast_time_limit_ms: u64,
    /// More opinions than this select hybrid.
    pub hybrid_min_opinions: usize,
    /// A specialization above this makes a participant an expert.
    pub expert_threshold: f64,
    /// Confidence multiplier for experts in expert-led.
    pub expert_boost: f64,
    pub delphi_max_rounds: u8,
    /// Delphi stops once agreement exceeds this.
    pub delphi_early_stop: f64,
    /// Delphi confidence multiplier for opinions agreeing with the interim result.
    pub delphi_agree_factor: f64,
    /// Delphi confidence multiplier for dissenting opinions.
    pub delphi_disagree_factor: f64,
    /// Results kept in memory for metrics.
    pub history_capacity: usize,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            unanimous_threshold: 0.95,
            expert_selection_threshold: 0.8,
            fast_time_limit_ms: 1_000,
            hybrid_min_opinions: 5,
            expert_threshold: 0.7,
            expert_boost: 2.0,
            delphi_max_rounds: 3,
            delphi_early_stop: 0.8,
            delphi_agree_factor: 1.1,
            delphi_disagree_factor: 0.95,
            history_capacity: 1_000,
        }
    }
}
