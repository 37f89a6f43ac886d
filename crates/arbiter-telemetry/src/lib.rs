//! # Arbiter Telemetry
//!
//! Logging setup shared by the arbitration engines, plus Prometheus text
//! export of the engines' metrics when the `metrics` feature is on.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use arbiter_telemetry::{init_telemetry, TelemetryConfig};
//!
//! init_telemetry(&TelemetryConfig::from_env())?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AR_SERVICE_NAME` | `arbiter` | Service name in records |
//! | `AR_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `AR_CONSOLE_OUTPUT` | `true` | Write records to stdout |
//! | `AR_JSON_LOGS` | `false` | JSON records (defaults on in containers) |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{env_filter, init_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("Subscriber already initialized: {0}")]
    AlreadyInitialized(String),

    #[error("Failed to encode metrics: {0}")]
    MetricsEncode(String),
}

/// Install logging for the process.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    init_logging(config)
}

/// Render every registered engine metric in the Prometheus text format.
#[cfg(feature = "metrics")]
pub fn encode_metrics() -> Result<String, TelemetryError> {
    use prometheus::{Encoder, TextEncoder};

    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&prometheus::gather(), &mut buffer)
        .map_err(|e| TelemetryError::MetricsEncode(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsEncode(e.to_string()))
}
