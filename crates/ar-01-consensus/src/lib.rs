//! # ar-01-consensus
//!
//! Consensus engine: turns a flat set of confidence-weighted,
//! evidence-backed opinions into one decision.
//!
//! ## Overview
//!
//! - **Seven strategies**: unanimous, weighted-majority, expert-led,
//!   evidence-based, byzantine-fault-tolerant, delphi-method, hybrid
//! - **Automatic selection** from request attributes, or explicit choice
//! - **Adaptive trust**: every decision nudges participant trust ±2%
//! - **Explanation trail** and dissenters on every result
//!
//! ## Architecture
//!
//! ```text
//! caller ──ConsensusRequest──→ ConsensusService
//!                                   │
//!                                   ├── RequestValidator
//!                                   ├── WeightContext (registry + trust snapshot)
//!                                   ├── select_method → run_strategy
//!                                   ├── TrustTracker::apply_outcome
//!                                   └── EventPublisher ──→ ConsensusReached / TrustAdjusted
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use ar_01_consensus::{ConsensusDependencies, ConsensusRequest, ConsensusService, Opinion};
//! use ar_01_consensus::ports::ConsensusApi;
//!
//! let service = ConsensusService::new(ConsensusDependencies::with_publisher(bus));
//! let request = ConsensusRequest::new(
//!     "max-line-length",
//!     vec![Opinion::new("a", 80, 0.9), Opinion::new("b", 80, 0.8), Opinion::new("c", 120, 0.6)],
//! );
//! let result = service.reach_consensus(request).await?;
//! assert_eq!(result.dissenters.len(), 1);
//! ```

pub mod domain;
pub mod metrics;
pub mod ports;
pub mod service;
pub mod state;
pub mod validation;

pub use domain::{
    ConsensusConfig, ConsensusError, ConsensusMethod, ConsensusMetrics, ConsensusRequest,
    ConsensusResult, Dissenter, EngineResult, Opinion, Requirements, WeightContext,
};
pub use ports::ConsensusApi;
pub use service::{ConsensusDependencies, ConsensusService};
