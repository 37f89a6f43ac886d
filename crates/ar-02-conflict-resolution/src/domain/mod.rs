//! Domain layer for the conflict resolver
//!
//! ## Modules
//! - conflict: conflicts, positions and their context
//! - resolution: resolutions, dissent, compromises and statistics
//! - context: per-conflict snapshot of config and participant profiles
//! - middle_ground: compromise stance and confidence-weighted agreement
//! - mediation: bounded mediation state machine
//! - strategies: the nine resolution methods
//! - selector: automatic method choice

pub mod config;
pub mod conflict;
pub mod context;
pub mod error;
pub mod mediation;
pub mod middle_ground;
pub mod resolution;
pub mod selector;
pub mod strategies;

pub use config::ResolverConfig;
pub use conflict::{
    Conflict, ConflictContext, ConflictKind, ConflictRequirements, Position, Severity,
};
pub use context::ResolutionContext;
pub use error::{ResolutionError, ResolutionResult};
pub use mediation::{
    MediationOutcome, MediationReport, MediationState, MediationStep, Mediator, RoundSnapshot,
};
pub use middle_ground::{confidence_agreement, middle_ground};
pub use resolution::{
    Compromise, DissentRecord, DissentSeverity, PartitionShare, Resolution, ResolutionMethod,
    ResolutionOutcome, ResolutionStatistics,
};
pub use selector::select_method;
pub use strategies::{escalation, run_strategy, FOLLOW_UP_HUMAN_REVIEW, FOLLOW_UP_REVISIT};
