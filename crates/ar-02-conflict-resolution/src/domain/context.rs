//! Per-conflict snapshot handed to strategies

use super::ResolverConfig;
use shared_types::{Participant, ParticipantId, ParticipantRegistry};
use std::collections::HashMap;

/// Configuration plus a copy of the participant profiles.
///
/// Strategies read this and never the live registry.
#[derive(Clone, Debug)]
pub struct ResolutionContext<'a> {
    pub config: &'a ResolverConfig,
    profiles: HashMap<ParticipantId, Participant>,
}

impl<'a> ResolutionContext<'a> {
    /// Context without any participant profiles.
    pub fn new(config: &'a ResolverConfig) -> Self {
        Self {
            config,
            profiles: HashMap::new(),
        }
    }

    pub fn capture(config: &'a ResolverConfig, registry: &ParticipantRegistry) -> Self {
        Self {
            config,
            profiles: registry.snapshot(),
        }
    }

    pub fn with_profiles(
        config: &'a ResolverConfig,
        profiles: impl IntoIterator<Item = Participant>,
    ) -> Self {
        Self {
            config,
            profiles: profiles.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    /// Whether `participant` is specialised in `domain` above the expert threshold.
    pub fn is_expert(&self, participant: &str, domain: &str) -> bool {
        self.profiles
            .get(participant)
            .and_then(|p| p.specialization(domain))
            .is_some_and(|s| s > self.config.expert_threshold)
    }
}
