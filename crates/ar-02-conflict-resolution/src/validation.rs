use crate::domain::{Conflict, ResolutionError, ResolutionResult};

/// Stateless conflict checks run before any strategy.
pub struct ConflictValidator;

impl ConflictValidator {
    pub fn validate(conflict: &Conflict) -> ResolutionResult<()> {
        if conflict.positions.is_empty() {
            return Err(ResolutionError::EmptyInput);
        }

        for position in &conflict.positions {
            for (field, value) in [
                ("confidence", position.confidence),
                ("flexibility", position.flexibility),
            ] {
                if !(0.0..=1.0).contains(&value) {
                    return Err(ResolutionError::InvalidPosition {
                        participant: position.participant.clone(),
                        field,
                        value,
                    });
                }
            }
        }
        Ok(())
    }
}
