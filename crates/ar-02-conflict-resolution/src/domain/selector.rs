//! Resolution method selection
//!
//! 1. critical severity → arbitration
//! 2. time constraint under the voting limit → voting
//! 3. minor and deferrable → deferral
//! 4. the kind's preferred method
//! 5. mediation, for kinds without a preference

use super::{Conflict, ResolutionMethod, ResolverConfig, Severity};

/// Pick a method for `conflict`.
pub fn select_method(conflict: &Conflict, config: &ResolverConfig) -> ResolutionMethod {
    if conflict.severity == Severity::Critical {
        return ResolutionMethod::Arbitration;
    }

    if conflict
        .context
        .time_constraint_ms
        .is_some_and(|t| t < config.voting_time_limit_ms)
    {
        return ResolutionMethod::Voting;
    }

    if conflict.severity == Severity::Minor && conflict.context.requirements.can_defer {
        return ResolutionMethod::Deferral;
    }

    config
        .kind_preferences
        .get(&conflict.kind)
        .copied()
        .unwrap_or(ResolutionMethod::Mediation)
}
