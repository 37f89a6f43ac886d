//! Conflict resolver configuration

use super::{ConflictKind, ResolutionMethod};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Mediation stops once agreement reaches this.
    pub agreement_threshold: f64,
    pub max_rounds: u8,
    /// Flexibility multiplier between mediation rounds (capped at 1.0).
    pub flexibility_growth: f64,
    /// Confidence multiplier between mediation rounds.
    pub confidence_decay: f64,
    /// Positions at least this flexible adopt the middle ground.
    pub adoption_flexibility: f64,
    /// A specialization above this makes a participant a domain expert.
    pub expert_threshold: f64,
    /// Time constraints below this (ms) select voting.
    pub voting_time_limit_ms: u64,
    pub synthesis_agreement: f64,
    pub compromise_confidence: f64,
    /// Resolutions kept in memory for statistics.
    pub history_capacity: usize,
    /// Preferred method per conflict kind.
    pub kind_preferences: BTreeMap<ConflictKind, ResolutionMethod>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        let kind_preferences = BTreeMap::from([
            (ConflictKind::Definition, ResolutionMethod::Arbitration),
            (ConflictKind::Scope, ResolutionMethod::Partition),
            (ConflictKind::Priority, ResolutionMethod::Voting),
            (ConflictKind::Methodology, ResolutionMethod::Compromise),
            (ConflictKind::Prediction, ResolutionMethod::EvidenceEvaluation),
            (ConflictKind::ValueDisagreement, ResolutionMethod::EvidenceEvaluation),
            (ConflictKind::Interpretation, ResolutionMethod::Synthesis),
        ]);
        Self {
            agreement_threshold: 0.7,
            max_rounds: 5,
            flexibility_growth: 1.1,
            confidence_decay: 0.95,
            adoption_flexibility: 0.5,
            expert_threshold: 0.7,
            voting_time_limit_ms: 5_000,
            synthesis_agreement: 0.8,
            compromise_confidence: 0.7,
            history_capacity: 1_000,
            kind_preferences,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: ResolverConfig =
            serde_json::from_str(r#"{"max_rounds": 3, "kind_preferences": {"scope": "voting"}}"#)
                .unwrap();
        assert_eq!(config.max_rounds, 3);
        assert_eq!(config.agreement_threshold, 0.7);
        assert_eq!(
            config.kind_preferences.get(&ConflictKind::Scope),
            Some(&ResolutionMethod::Voting)
        );
        assert!(config.kind_preferences.get(&ConflictKind::Definition).is_none());
    }
}
