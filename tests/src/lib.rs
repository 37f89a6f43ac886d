//! # Arbiter Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/
//! │   ├── consensus_flows.rs   # ar-01 over the shared bus
//! │   ├── conflict_flows.rs    # ar-02 over the shared bus
//! │   └── choreography.rs      # low-agreement consensus handed to ar-02
//! └── benches/
//!     └── arbitration_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ar-tests
//! cargo test -p ar-tests integration::choreography
//! cargo bench -p ar-tests
//! ```

pub mod integration;
