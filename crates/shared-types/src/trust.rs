//! # Trust Tracker
//!
//! Per-participant trust multiplier, adjusted after every consensus outcome.
//!
//! Updates are multiplicative (`×1.02` when the participant agreed with the
//! outcome, `×0.98` when it dissented) and clamped to `[0.5, 1.5]`. Scores are
//! only ever reset by constructing a new tracker.

use crate::participant::ParticipantId;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// Trust update parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrustConfig {
    /// Score for participants with no history.
    pub initial: f64,
    /// Multiplier when the participant agreed with the outcome.
    pub reward: f64,
    /// Multiplier when the participant dissented.
    pub penalty: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            initial: 1.0,
            reward: 1.02,
            penalty: 0.98,
            min: 0.5,
            max: 1.5,
        }
    }
}

/// One applied trust change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrustAdjustment {
    pub participant: ParticipantId,
    pub agreed: bool,
    pub before: f64,
    pub after: f64,
}

/// Mutable participant → trust map.
pub struct TrustTracker {
    config: TrustConfig,
    scores: RwLock<HashMap<ParticipantId, f64>>,
}

impl TrustTracker {
    pub fn new() -> Self {
        Self::with_config(TrustConfig::default())
    }

    pub fn with_config(config: TrustConfig) -> Self {
        Self {
            config,
            scores: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &TrustConfig {
        &self.config
    }

    /// Current trust for a participant.
    pub fn trust(&self, participant: &str) -> f64 {
        self.scores
            .read()
            .get(participant)
            .copied()
            .unwrap_or(self.config.initial)
    }

    /// Apply one outcome to one participant, returning the new score.
    pub fn update_trust(&self, participant: &str, agreed: bool) -> f64 {
        let mut scores = self.scores.write();
        self.adjust(&mut scores, participant, agreed).after
    }

    /// Apply a whole outcome under a single write lock.
    ///
    /// Each participant is adjusted at most once per outcome; repeated ids
    /// after the first are ignored.
    pub fn apply_outcome<'a, I>(&self, outcomes: I) -> Vec<TrustAdjustment>
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut scores = self.scores.write();
        outcomes
            .into_iter()
            .filter(|(participant, _)| seen.insert(*participant))
            .map(|(participant, agreed)| self.adjust(&mut scores, participant, agreed))
            .collect()
    }

    /// Copy of every tracked score.
    pub fn snapshot(&self) -> HashMap<ParticipantId, f64> {
        self.scores.read().clone()
    }

    fn adjust(
        &self,
        scores: &mut HashMap<ParticipantId, f64>,
        participant: &str,
        agreed: bool,
    ) -> TrustAdjustment {
        let before = scores
            .get(participant)
            .copied()
            .unwrap_or(self.config.initial);
        let factor = if agreed {
            self.config.reward
        } else {
            self.config.penalty
        };
        let after = (before * factor).clamp(self.config.min, self.config.max);
        scores.insert(participant.to_string(), after);
        trace!(participant, agreed, before, after, "Trust adjusted");
        TrustAdjustment {
            participant: participant.to_string(),
            agreed,
            before,
            after,
        }
    }
}

impl Default for TrustTracker {
    fn default() -> Self {
        Self::new()
    }
}
