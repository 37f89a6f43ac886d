//! Subscriber installation.
//!
//! Records carry `target`, `level` and the structured fields the engines
//! attach (`topic`, `method`, `conflict_id`, ...). JSON output adds thread
//! ids and source locations for log shippers.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Build the level filter for `config`.
pub fn env_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::Filter(format!("{}: {}", config.log_level, e)))
}

/// Install the global subscriber.
///
/// Fails with [`TelemetryError::AlreadyInitialized`] when another subscriber
/// is already set.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = env_filter(config)?;

    let result = if !config.console_output {
        tracing_subscriber::registry().with(filter).try_init()
    } else if config.json_logs {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);
        tracing_subscriber::registry()
            .with(filter)
            .with(json_layer)
            .try_init()
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_ansi(true);
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
    };
    result.map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;

    tracing::info!(
        service = %config.service_name,
        level = %config.log_level,
        json = config.json_logs,
        "Telemetry initialized"
    );
    Ok(())
}

/// Structured record tagged with the emitting engine.
///
/// ```rust,ignore
/// log_event!(info, "ar-01", "Consensus reached", topic = %topic, agreement = 0.74);
/// ```
#[macro_export]
macro_rules! log_event {
    (info, $engine:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            engine = $engine,
            $($($field)*,)?
            $msg
        )
    };

    (warn, $engine:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::warn!(
            engine = $engine,
            $($($field)*,)?
            $msg
        )
    };

    (error, $engine:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::error!(
            engine = $engine,
            $($($field)*,)?
            $msg
        )
    };

    (debug, $engine:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::debug!(
            engine = $engine,
            $($($field)*,)?
            $msg
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_accepts_directives() {
        let config = TelemetryConfig {
            log_level: "info,ar_02_conflict_resolution=debug".to_string(),
            ..Default::default()
        };
        assert!(env_filter(&config).is_ok());
    }

    #[test]
    fn test_env_filter_rejects_garbage() {
        let config = TelemetryConfig {
            log_level: "ar_01_consensus=loudest".to_string(),
            ..Default::default()
        };
        assert!(matches!(env_filter(&config), Err(TelemetryError::Filter(_))));
    }

    #[test]
    fn test_log_event_macro_expands() {
        let topic = "max-line-length";
        crate::log_event!(info, "ar-01", "Consensus reached", topic = %topic, agreement = 0.74);
        crate::log_event!(warn, "ar-02", "Conflict escalated");
    }
}
