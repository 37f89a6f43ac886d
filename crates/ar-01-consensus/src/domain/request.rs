//! Consensus request entities

use serde::{Deserialize, Serialize};
use shared_types::{now_millis, Evidence, ParticipantId, Stance};

/// One participant's stance in a consensus request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Opinion {
    pub participant: ParticipantId,
    pub value: Stance,
    /// Pre-normalized confidence in `[0, 1]`.
    pub confidence: f64,
    pub evidence: Vec<Evidence>,
    /// Ordered reasoning steps.
    pub reasoning: Vec<String>,
    /// Unix milliseconds.
    pub timestamp: u64,
}

impl Opinion {
    pub fn new(participant: impl Into<ParticipantId>, value: impl Into<Stance>, confidence: f64) -> Self {
        Self {
            participant: participant.into(),
            value: value.into(),
            confidence,
            evidence: Vec::new(),
            reasoning: Vec::new(),
            timestamp: now_millis(),
        }
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

/// Caller requirements that steer strategy selection and weighting.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Requirements {
    /// Minimum agreement the caller hopes for, in `[0, 1]`.
    pub minimum_agreement: Option<f64>,
    /// Advisory time budget in milliseconds. Not enforced.
    pub time_limit_ms: Option<u64>,
    /// Decide on evidence rather than votes.
    pub evidence_required: bool,
    /// How much listed expertise should boost weight, in `[0, 1]`.
    pub expertise_weight: Option<f64>,
}

/// One arbitration ask.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsensusRequest {
    pub topic: String,
    pub domain: Option<String>,
    pub opinions: Vec<Opinion>,
    pub requirements: Requirements,
}

impl ConsensusRequest {
    pub fn new(topic: impl Into<String>, opinions: Vec<Opinion>) -> Self {
        Self {
            topic: topic.into(),
            domain: None,
            opinions,
            requirements: Requirements::default(),
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_requirements(mut self, requirements: Requirements) -> Self {
        self.requirements = requirements;
        self
    }

    /// Copy of this request with different opinions (used by iterative
    /// strategies).
    pub(crate) fn with_opinions(&self, opinions: Vec<Opinion>) -> Self {
        Self {
            topic: self.topic.clone(),
            domain: self.domain.clone(),
            opinions,
            requirements: self.requirements.clone(),
        }
    }
}
