//! Conflict entities

use serde::{Deserialize, Serialize};
use shared_types::{now_millis, Evidence, ParticipantId, Stance};
use std::fmt;
use uuid::Uuid;

/// What the participants disagree about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictKind {
    ValueDisagreement,
    Interpretation,
    Methodology,
    Priority,
    Scope,
    Definition,
    Prediction,
}

impl ConflictKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValueDisagreement => "value-disagreement",
            Self::Interpretation => "interpretation",
            Self::Methodology => "methodology",
            Self::Priority => "priority",
            Self::Scope => "scope",
            Self::Definition => "definition",
            Self::Prediction => "prediction",
        }
    }
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Minor,
    #[default]
    Moderate,
    Major,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minor => "minor",
            Self::Moderate => "moderate",
            Self::Major => "major",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One participant's stance in a conflict.
///
/// Mediation only ever raises `flexibility` and lowers `confidence`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub participant: ParticipantId,
    pub value: Stance,
    /// In `[0, 1]`.
    pub confidence: f64,
    /// Willingness to move toward a compromise, in `[0, 1]`.
    pub flexibility: f64,
    pub evidence: Vec<Evidence>,
    pub reasoning: Vec<String>,
    /// Unix milliseconds.
    pub timestamp: u64,
}

impl Position {
    pub fn new(participant: impl Into<ParticipantId>, value: impl Into<Stance>, confidence: f64) -> Self {
        Self {
            participant: participant.into(),
            value: value.into(),
            confidence,
            flexibility: 0.0,
            evidence: Vec::new(),
            reasoning: Vec::new(),
            timestamp: now_millis(),
        }
    }

    pub fn with_flexibility(mut self, flexibility: f64) -> Self {
        self.flexibility = flexibility;
        self
    }

    pub fn with_evidence(mut self, evidence: Evidence) -> Self {
        self.evidence.push(evidence);
        self
    }

    pub fn with_reasoning(mut self, step: impl Into<String>) -> Self {
        self.reasoning.push(step.into());
        self
    }
}

/// Caller constraints on how the conflict may be resolved.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConflictRequirements {
    /// The decision can wait for more information.
    pub can_defer: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConflictContext {
    /// How much the outcome matters, in `[0, 1]`.
    pub importance: f64,
    /// Advisory time budget in milliseconds.
    pub time_constraint_ms: Option<u64>,
    pub requirements: ConflictRequirements,
}

impl Default for ConflictContext {
    fn default() -> Self {
        Self {
            importance: 0.5,
            time_constraint_ms: None,
            requirements: ConflictRequirements::default(),
        }
    }
}

/// One open-ended disagreement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    pub id: String,
    pub topic: String,
    pub domain: Option<String>,
    /// Distinct participants in first-seen order.
    pub participants: Vec<ParticipantId>,
    pub positions: Vec<Position>,
    pub severity: Severity,
    pub kind: ConflictKind,
    pub context: ConflictContext,
}

impl Conflict {
    /// New conflict with a generated id and moderate severity.
    pub fn new(topic: impl Into<String>, kind: ConflictKind, positions: Vec<Position>) -> Self {
        let mut participants: Vec<ParticipantId> = Vec::new();
        for position in &positions {
            if !participants.contains(&position.participant) {
                participants.push(position.participant.clone());
            }
        }
        Self {
            id: Uuid::new_v4().to_string(),
            topic: topic.into(),
            domain: None,
            participants,
            positions,
            severity: Severity::default(),
            kind,
            context: ConflictContext::default(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_context(mut self, context: ConflictContext) -> Self {
        self.context = context;
        self
    }

    /// Whether every position holds a record stance.
    pub fn all_records(&self) -> bool {
        !self.positions.is_empty() && self.positions.iter().all(|p| p.value.is_record())
    }
}
