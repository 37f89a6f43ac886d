//! # Shared Types Crate
//!
//! This crate contains the domain vocabulary shared by the consensus engine
//! (`ar-01`) and the conflict resolver (`ar-02`).
//!
//! ## Contents
//!
//! - **Stance**: the closed set of values participants can disagree about.
//! - **Evidence**: supporting material plus the evidence scorer.
//! - **Participant Registry**: static participant profiles (expertise,
//!   reliability, per-domain specialization).
//! - **Stance Tally**: weighted grouping by stance, shared by every
//!   voting-style strategy.
//! - **Trust Tracker**: the per-participant multiplier adjusted after every
//!   consensus outcome.
//!
//! ## Shared State
//!
//! The registry and the trust tracker are the only mutable state shared
//! between requests. Both are owned components (never globals) guarded by a
//! single `RwLock` each, so strategies read a snapshot and the engines
//! perform one write-back per resolved request.

pub mod errors;
pub mod evidence;
pub mod participant;
pub mod stance;
pub mod tally;
pub mod trust;

pub use errors::*;
pub use evidence::{
    score_evidence, Evidence, EvidenceKind, EvidenceStrength, EvidenceSummary,
    NEUTRAL_EVIDENCE_SCORE, VERIFIABLE_BONUS,
};
pub use participant::{Participant, ParticipantId, ParticipantRegistry};
pub use stance::Stance;
pub use tally::{StanceGroup, StanceTally};
pub use trust::{TrustAdjustment, TrustConfig, TrustTracker};

/// Current unix timestamp in milliseconds.
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
