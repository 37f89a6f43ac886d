use crate::domain::{ConsensusError, ConsensusRequest, EngineResult};

/// Stateless request checks run before any strategy.
pub struct RequestValidator;

impl RequestValidator {
    /// Reject empty requests and out-of-range numbers.
    pub fn validate(request: &ConsensusRequest) -> EngineResult<()> {
        if request.opinions.is_empty() {
            return Err(ConsensusError::EmptyInput);
        }

        for opinion in &request.opinions {
            if !in_unit_range(opinion.confidence) {
                return Err(ConsensusError::InvalidConfidence {
                    participant: opinion.participant.clone(),
                    value: opinion.confidence,
                });
            }
        }

        let requirements = &request.requirements;
        if let Some(value) = requirements.minimum_agreement {
            if !in_unit_range(value) {
                return Err(ConsensusError::InvalidRequirement {
                    field: "minimum_agreement",
                    value,
                });
            }
        }
        if let Some(value) = requirements.expertise_weight {
            if !in_unit_range(value) {
                return Err(ConsensusError::InvalidRequirement {
                    field: "expertise_weight",
                    value,
                });
            }
        }

        Ok(())
    }
}

fn in_unit_range(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}
