//! Consensus outcome entities

use serde::{Deserialize, Serialize};
use shared_types::{EvidenceSummary, ParticipantId, Stance};
use std::fmt;
use std::time::Duration;

/// The seven consensus strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConsensusMethod {
    Unanimous,
    WeightedMajority,
    ExpertLed,
    EvidenceBased,
    ByzantineFaultTolerant,
    DelphiMethod,
    Hybrid,
}

impl ConsensusMethod {
    pub const ALL: [ConsensusMethod; 7] = [
        Self::Unanimous,
        Self::WeightedMajority,
        Self::ExpertLed,
        Self::EvidenceBased,
        Self::ByzantineFaultTolerant,
        Self::DelphiMethod,
        Self::Hybrid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unanimous => "unanimous",
            Self::WeightedMajority => "weighted-majority",
            Self::ExpertLed => "expert-led",
            Self::EvidenceBased => "evidence-based",
            Self::ByzantineFaultTolerant => "byzantine-fault-tolerant",
            Self::DelphiMethod => "delphi-method",
            Self::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for ConsensusMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A participant whose opinion lost.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dissenter {
    pub participant: ParticipantId,
    pub value: Stance,
    pub confidence: f64,
    /// Share of the total weight held by this dissenter's group.
    pub weight_share: f64,
}

/// Outcome of a consensus request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResult {
    pub topic: String,
    pub final_value: Stance,
    /// Weight of the winning group over total weight.
    pub agreement_level: f64,
    pub confidence: f64,
    /// Strategy that produced the decision.
    pub method: ConsensusMethod,
    pub dissenters: Vec<Dissenter>,
    /// Human-readable trail, in order.
    pub explanation: Vec<String>,
    /// Evidence behind the winning stance.
    pub evidence: EvidenceSummary,
    /// Iterations performed (delphi rounds; 1 for single-pass strategies).
    pub rounds: u8,
    pub duration: Duration,
}

impl ConsensusResult {
    /// Whether `participant` is among the dissenters.
    pub fn dissented(&self, participant: &str) -> bool {
        self.dissenters.iter().any(|d| d.participant == participant)
    }

    pub fn is_unanimous(&self) -> bool {
        self.dissenters.is_empty()
    }
}

/// Aggregate view over the consensus history.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsensusMetrics {
    pub total_consensus: usize,
    pub method_distribution: std::collections::BTreeMap<ConsensusMethod, usize>,
    pub average_agreement: f64,
    pub average_confidence: f64,
    pub average_duration: Duration,
    /// Fraction of results with at least one dissenter.
    pub dissent_rate: f64,
}
