//! # Participant Registry
//!
//! Static profile per known opinion producer. Profiles are read by the
//! weighting logic of both engines; unknown participants are scored with a
//! neutral default profile instead of being rejected.

use crate::errors::RegistryError;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Participant identifier (analyzer name).
pub type ParticipantId = String;

/// Reliability assumed for participants missing from the registry.
pub const DEFAULT_RELIABILITY: f64 = 0.5;

/// Domain expertise assumed when no domain applies or no score is on file.
pub const DEFAULT_DOMAIN_EXPERTISE: f64 = 0.5;

/// A known opinion producer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    /// Free-form expertise tags.
    pub expertise: BTreeSet<String>,
    /// Historical reliability in `[0, 1]`.
    reliability: f64,
    /// Domain → specialization score in `[0, 1]`.
    specialization: HashMap<String, f64>,
}

impl Participant {
    /// Create a profile. Reliability is clamped to `[0, 1]`.
    pub fn new(id: impl Into<ParticipantId>, reliability: f64) -> Self {
        Self {
            id: id.into(),
            expertise: BTreeSet::new(),
            reliability: clamp_unit(reliability),
            specialization: HashMap::new(),
        }
    }

    /// Neutral profile used for participants missing from the registry.
    pub fn unknown(id: impl Into<ParticipantId>) -> Self {
        Self::new(id, DEFAULT_RELIABILITY)
    }

    /// Add expertise tags.
    pub fn with_expertise<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expertise.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Set a domain specialization score (clamped to `[0, 1]`).
    pub fn with_specialization(mut self, domain: impl Into<String>, score: f64) -> Self {
        self.specialization.insert(domain.into(), clamp_unit(score));
        self
    }

    pub fn reliability(&self) -> f64 {
        self.reliability
    }

    /// Raw specialization for a domain, if any is on file.
    pub fn specialization(&self, domain: &str) -> Option<f64> {
        self.specialization.get(domain).copied()
    }

    /// Expertise factor used by weighting.
    ///
    /// No domain, or no score for the domain, yields
    /// [`DEFAULT_DOMAIN_EXPERTISE`].
    pub fn domain_expertise(&self, domain: Option<&str>) -> f64 {
        domain
            .and_then(|d| self.specialization(d))
            .unwrap_or(DEFAULT_DOMAIN_EXPERTISE)
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Registry of participant profiles.
pub struct ParticipantRegistry {
    profiles: RwLock<HashMap<ParticipantId, Participant>>,
}

impl ParticipantRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry holding the built-in analyzer profiles.
    pub fn with_seed() -> Self {
        let registry = Self::new();
        {
            let mut profiles = registry.profiles.write();
            for profile in seed_profiles() {
                profiles.insert(profile.id.clone(), profile);
            }
        }
        registry
    }

    /// Register a new profile.
    pub fn register(&self, participant: Participant) -> Result<(), RegistryError> {
        if participant.id.is_empty() {
            return Err(RegistryError::EmptyId);
        }
        let mut profiles = self.profiles.write();
        if profiles.contains_key(&participant.id) {
            return Err(RegistryError::DuplicateParticipant(participant.id));
        }
        debug!(participant = %participant.id, "Participant registered");
        profiles.insert(participant.id.clone(), participant);
        Ok(())
    }

    /// Insert or replace a profile.
    pub fn upsert(&self, participant: Participant) {
        self.profiles
            .write()
            .insert(participant.id.clone(), participant);
    }

    pub fn get(&self, id: &str) -> Option<Participant> {
        self.profiles.read().get(id).cloned()
    }

    /// Profile for `id`, or the neutral default when unknown.
    pub fn profile_or_default(&self, id: &str) -> Participant {
        self.get(id).unwrap_or_else(|| Participant::unknown(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.profiles.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.profiles.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.read().is_empty()
    }

    /// Copy of every profile, for strategies that need a stable view.
    pub fn snapshot(&self) -> HashMap<ParticipantId, Participant> {
        self.profiles.read().clone()
    }
}

impl Default for ParticipantRegistry {
    fn default() -> Self {
        Self::with_seed()
    }
}

fn seed_profiles() -> Vec<Participant> {
    vec![
        Participant::new("security-scanner", 0.9)
            .with_expertise(["security", "vulnerabilities", "dependencies"])
            .with_specialization("security", 0.95)
            .with_specialization("quality", 0.6),
        Participant::new("performance-analyzer", 0.85)
            .with_expertise(["performance", "profiling", "complexity"])
            .with_specialization("performance", 0.9)
            .with_specialization("architecture", 0.6),
        Participant::new("style-linter", 0.8)
            .with_expertise(["style", "formatting", "naming"])
            .with_specialization("style", 0.9)
            .with_specialization("quality", 0.7),
        Participant::new("architecture-reviewer", 0.85)
            .with_expertise(["architecture", "design", "coupling", "modularity"])
            .with_specialization("architecture", 0.9)
            .with_specialization("quality", 0.75),
        Participant::new("test-coverage-analyzer", 0.8)
            .with_expertise(["testing", "coverage"])
            .with_specialization("testing", 0.85)
            .with_specialization("quality", 0.65),
        Participant::new("documentation-checker", 0.75)
            .with_expertise(["documentation", "readability"])
            .with_specialization("documentation", 0.85)
            .with_specialization("style", 0.5),
    ]
}
