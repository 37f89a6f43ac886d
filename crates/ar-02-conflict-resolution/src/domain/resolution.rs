//! Resolution entities

use super::mediation::MediationReport;
use serde::{Deserialize, Serialize};
use shared_types::{ParticipantId, Stance};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// The nine resolution methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionMethod {
    Mediation,
    Arbitration,
    Synthesis,
    Voting,
    EvidenceEvaluation,
    Compromise,
    Partition,
    Deferral,
    Escalation,
}

impl ResolutionMethod {
    pub const ALL: [ResolutionMethod; 9] = [
        Self::Mediation,
        Self::Arbitration,
        Self::Synthesis,
        Self::Voting,
        Self::EvidenceEvaluation,
        Self::Compromise,
        Self::Partition,
        Self::Deferral,
        Self::Escalation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mediation => "mediation",
            Self::Arbitration => "arbitration",
            Self::Synthesis => "synthesis",
            Self::Voting => "voting",
            Self::EvidenceEvaluation => "evidence-evaluation",
            Self::Compromise => "compromise",
            Self::Partition => "partition",
            Self::Deferral => "deferral",
            Self::Escalation => "escalation",
        }
    }
}

impl fmt::Display for ResolutionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One slice of a partitioned outcome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartitionShare {
    pub participant: ParticipantId,
    pub stance: Stance,
}

/// What a resolution decided.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ResolutionOutcome {
    /// A single stance everyone proceeds with.
    Decided(Stance),
    /// Each participant keeps its own scope, keyed `partition_i`.
    Partitioned(BTreeMap<String, PartitionShare>),
    /// Handed to a human.
    Escalated {
        reason: String,
        /// Leading stance at the time of escalation, if any.
        best: Option<Stance>,
    },
}

impl ResolutionOutcome {
    pub fn decided(&self) -> Option<&Stance> {
        match self {
            Self::Decided(stance) => Some(stance),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DissentSeverity {
    /// Disagrees but accepts the outcome.
    Accepts,
    Reservations,
    /// Holds its position firmly.
    Objects,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DissentRecord {
    pub participant: ParticipantId,
    pub severity: DissentSeverity,
    pub reason: String,
}

/// A participant that moved off its original stance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Compromise {
    pub participant: ParticipantId,
    pub original: Stance,
    pub adopted: Stance,
    /// Flexibility at the time of the concession.
    pub flexibility: f64,
}

/// Outcome of a conflict.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub conflict_id: String,
    pub method: ResolutionMethod,
    /// `None` for deferral.
    pub outcome: Option<ResolutionOutcome>,
    pub agreement_level: f64,
    pub dissent: Vec<DissentRecord>,
    pub compromises: Vec<Compromise>,
    pub duration: Duration,
    pub confidence: f64,
    /// Actions for whoever picks the conflict up next.
    pub follow_up: Vec<String>,
    pub explanation: Vec<String>,
    /// Present when mediation ran.
    pub mediation: Option<MediationReport>,
}

impl Resolution {
    /// Empty resolution for `conflict_id`; strategies fill in the rest.
    pub fn new(conflict_id: impl Into<String>, method: ResolutionMethod) -> Self {
        Self {
            conflict_id: conflict_id.into(),
            method,
            outcome: None,
            agreement_level: 0.0,
            dissent: Vec::new(),
            compromises: Vec::new(),
            duration: Duration::ZERO,
            confidence: 0.0,
            follow_up: Vec::new(),
            explanation: Vec::new(),
            mediation: None,
        }
    }

    pub fn is_escalated(&self) -> bool {
        matches!(self.outcome, Some(ResolutionOutcome::Escalated { .. }))
    }

    /// The decided stance, if there is one.
    pub fn decided(&self) -> Option<&Stance> {
        self.outcome.as_ref().and_then(ResolutionOutcome::decided)
    }
}

/// Aggregate view over the resolution history.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolutionStatistics {
    pub total_resolutions: usize,
    pub method_distribution: BTreeMap<ResolutionMethod, usize>,
    pub average_agreement: f64,
    pub average_duration: Duration,
    /// Fraction of resolutions that escalated.
    pub escalation_rate: f64,
}
