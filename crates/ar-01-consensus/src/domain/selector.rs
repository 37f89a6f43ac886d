//! Automatic strategy selection
//!
//! Rules are checked in order; the first match wins.
//!
//! | # | Condition | Strategy |
//! |---|-----------|----------|
//! | 1 | `minimum_agreement` > 0.95 | unanimous |
//! | 2 | `evidence_required` | evidence-based |
//! | 3 | an opining participant has specialization > 0.8 in the domain | expert-led |
//! | 4 | `time_limit_ms` < 1000 | weighted-majority |
//! | 5 | more than 5 opinions | hybrid |
//! | 6 | otherwise | weighted-majority |
//!
//! Byzantine-fault-tolerant and delphi are never chosen automatically.

use super::{ConsensusConfig, ConsensusMethod, ConsensusRequest, WeightContext};

/// Pick a strategy for `request`.
pub fn select_method(
    request: &ConsensusRequest,
    ctx: &WeightContext,
    config: &ConsensusConfig,
) -> ConsensusMethod {
    let requirements = &request.requirements;

    if requirements
        .minimum_agreement
        .is_some_and(|m| m > config.unanimous_threshold)
    {
        return ConsensusMethod::Unanimous;
    }

    if requirements.evidence_required {
        return ConsensusMethod::EvidenceBased;
    }

    if let Some(domain) = request.domain.as_deref() {
        let has_expert = request.opinions.iter().any(|o| {
            ctx.specialization(&o.participant, domain)
                .is_some_and(|s| s > config.expert_selection_threshold)
        });
        if has_expert {
            return ConsensusMethod::ExpertLed;
        }
    }

    if requirements
        .time_limit_ms
        .is_some_and(|t| t < config.fast_time_limit_ms)
    {
        return ConsensusMethod::WeightedMajority;
    }

    if request.opinions.len() > config.hybrid_min_opinions {
        return ConsensusMethod::Hybrid;
    }

    ConsensusMethod::WeightedMajority
}
