//! Domain layer for the consensus engine
//!
//! ## Modules
//! - request: opinions, requirements and the consensus request
//! - result: consensus results, dissenters and history metrics
//! - weighting: per-request weight snapshot
//! - strategies: the seven consensus strategies
//! - selector: automatic strategy choice

pub mod config;
pub mod error;
pub mod request;
pub mod result;
pub mod selector;
pub mod strategies;
pub mod weighting;

pub use config::ConsensusConfig;
pub use error::{ConsensusError, EngineResult};
pub use request::{ConsensusRequest, Opinion, Requirements};
pub use result::{ConsensusMethod, ConsensusMetrics, ConsensusResult, Dissenter};
pub use selector::select_method;
pub use strategies::run_strategy;
pub use weighting::WeightContext;
