//! # ar-02-conflict-resolution
//!
//! Conflict resolver: settles explicit disagreements between participants
//! holding conflicting positions.
//!
//! ## Overview
//!
//! - **Nine methods**: mediation, arbitration, synthesis, voting,
//!   evidence-evaluation, compromise, partition, deferral, escalation
//! - **Bounded mediation**: at most `max_rounds` rounds, then escalation
//! - **Escalation safety net**: a failing strategy never surfaces as an
//!   error; the caller gets an escalation resolution instead
//!
//! ## Architecture
//!
//! ```text
//! caller ──Conflict──→ ConflictResolver
//!                          │
//!                          ├── ConflictValidator
//!                          ├── select_method → run_strategy
//!                          │                     └── Mediator (round loop)
//!                          ├── ResolverState (history, statistics)
//!                          └── EventPublisher ──→ ConflictResolved / ConflictEscalated
//! ```

pub mod domain;
pub mod metrics;
pub mod ports;
pub mod service;
pub mod state;
pub mod validation;

pub use domain::{
    Conflict, ConflictContext, ConflictKind, ConflictRequirements, DissentRecord,
    DissentSeverity, Position, Resolution, ResolutionError, ResolutionMethod, ResolutionOutcome,
    ResolutionResult, ResolutionStatistics, ResolverConfig, Severity,
};
pub use ports::ConflictResolutionApi;
pub use service::{ConflictResolver, ResolverDependencies};
