//! # Arbitration Events
//!
//! Every event the two engines publish. Payloads carry plain data only so
//! listeners need no dependency on either engine crate.

use crate::{CONFLICT_RESOLVER, CONSENSUS_ENGINE};
use serde::{Deserialize, Serialize};
use shared_types::{ParticipantId, Stance, TrustAdjustment};

/// Identifier of the publishing engine.
pub type EngineId = u8;

/// All events that can be published to the bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ArbitrationEvent {
    // =========================================================================
    // ar-01: CONSENSUS ENGINE
    // =========================================================================
    /// A consensus request passed validation and is being decided.
    ConsensusStarted {
        topic: String,
        method: String,
        opinions: usize,
    },

    /// A consensus request produced a decision.
    ConsensusReached {
        topic: String,
        method: String,
        final_value: Stance,
        agreement: f64,
        confidence: f64,
        dissenters: Vec<ParticipantId>,
    },

    /// A consensus request could not be decided.
    ConsensusFailed { topic: String, reason: String },

    /// Trust multipliers were updated after a decision.
    TrustAdjusted {
        topic: String,
        adjustments: Vec<TrustAdjustment>,
    },

    // =========================================================================
    // ar-02: CONFLICT RESOLVER
    // =========================================================================
    /// A conflict was accepted for resolution.
    ConflictStarted {
        conflict_id: String,
        topic: String,
        kind: String,
        severity: String,
        positions: usize,
    },

    /// One mediation round finished.
    MediationRoundCompleted {
        conflict_id: String,
        round: u8,
        agreement: f64,
    },

    /// A conflict produced a resolution (including deferral).
    ConflictResolved {
        conflict_id: String,
        method: String,
        agreement: f64,
        confidence: f64,
    },

    /// Automated resolution gave up and handed the conflict to a human.
    ConflictEscalated { conflict_id: String, reason: String },
}

impl ArbitrationEvent {
    /// Topic used for subscription filtering.
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::ConsensusStarted { .. }
            | Self::ConsensusReached { .. }
            | Self::ConsensusFailed { .. } => EventTopic::Consensus,
            Self::TrustAdjusted { .. } => EventTopic::Trust,
            Self::MediationRoundCompleted { .. } => EventTopic::Mediation,
            Self::ConflictStarted { .. }
            | Self::ConflictResolved { .. }
            | Self::ConflictEscalated { .. } => EventTopic::Conflict,
        }
    }

    /// Engine that published this event.
    #[must_use]
    pub fn source_engine(&self) -> EngineId {
        match self.topic() {
            EventTopic::Consensus | EventTopic::Trust => CONSENSUS_ENGINE,
            _ => CONFLICT_RESOLVER,
        }
    }

    /// Stable name, as in `consensus:reached`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ConsensusStarted { .. } => "consensus:started",
            Self::ConsensusReached { .. } => "consensus:reached",
            Self::ConsensusFailed { .. } => "consensus:failed",
            Self::TrustAdjusted { .. } => "trust:adjusted",
            Self::ConflictStarted { .. } => "conflict:started",
            Self::MediationRoundCompleted { .. } => "mediation:round",
            Self::ConflictResolved { .. } => "conflict:resolved",
            Self::ConflictEscalated { .. } => "conflict:escalated",
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Consensus requests and decisions.
    Consensus,
    /// Trust multiplier updates.
    Trust,
    /// Conflict lifecycle.
    Conflict,
    /// Per-round mediation progress.
    Mediation,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Source engines to include. Empty means all sources.
    pub source_engines: Vec<EngineId>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            source_engines: Vec::new(),
        }
    }

    /// Create a filter for events from specific engines.
    #[must_use]
    pub fn from_engines(engines: Vec<EngineId>) -> Self {
        Self {
            topics: Vec::new(),
            source_engines: engines,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &ArbitrationEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let source_match =
            self.source_engines.is_empty() || self.source_engines.contains(&event.source_engine());

        topic_match && source_match
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reached() -> ArbitrationEvent {
        ArbitrationEvent::ConsensusReached {
            topic: "max-line-length".to_string(),
            method: "weighted-majority".to_string(),
            final_value: Stance::Numeric(80.0),
            agreement: 0.7,
            confidence: 0.85,
            dissenters: vec!["c".to_string()],
        }
    }

    fn escalated() -> ArbitrationEvent {
        ArbitrationEvent::ConflictEscalated {
            conflict_id: "c-1".to_string(),
            reason: "no valid position".to_string(),
        }
    }

    #[test]
    fn test_event_topic_mapping() {
        assert_eq!(reached().topic(), EventTopic::Consensus);
        assert_eq!(reached().source_engine(), CONSENSUS_ENGINE);
        assert_eq!(escalated().topic(), EventTopic::Conflict);
        assert_eq!(escalated().source_engine(), CONFLICT_RESOLVER);
    }

    #[test]
    fn test_event_names() {
        assert_eq!(reached().name(), "consensus:reached");
        assert_eq!(escalated().name(), "conflict:escalated");
    }

    #[test]
    fn test_filter_all() {
        assert!(EventFilter::all().matches(&reached()));
        assert!(EventFilter::topics(vec![EventTopic::All]).matches(&escalated()));
    }

    #[test]
    fn test_filter_by_topic() {
        let filter = EventFilter::topics(vec![EventTopic::Consensus]);
        assert!(filter.matches(&reached()));
        assert!(!filter.matches(&escalated()));
    }

    #[test]
    fn test_filter_by_engine() {
        let filter = EventFilter::from_engines(vec![CONFLICT_RESOLVER]);
        assert!(!filter.matches(&reached()));
        assert!(filter.matches(&escalated()));

        let round = ArbitrationEvent::MediationRoundCompleted {
            conflict_id: "c-1".to_string(),
            round: 2,
            agreement: 0.5,
        };
        assert!(filter.matches(&round));
    }
}
