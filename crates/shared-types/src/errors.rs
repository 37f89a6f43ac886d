//! # Error Types
//!
//! Defines error types used by both engines.

use thiserror::Error;

/// Errors raised while converting external values into a [`crate::Stance`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StanceError {
    /// JSON `null` carries no stance.
    #[error("Null is not a valid stance")]
    Null,

    /// Arrays have no defined equality or middle ground.
    #[error("Unsupported stance shape: {0}")]
    UnsupportedShape(String),
}

/// Errors from the participant registry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A profile with this id is already registered.
    #[error("Participant already registered: {0}")]
    DuplicateParticipant(String),

    /// Participant ids must be non-empty.
    #[error("Participant id must not be empty")]
    EmptyId,
}
