//! Logging and metrics for recordbind.
//!
//! - **Logging**: a `tracing-subscriber` setup with env filter, JSON or
//!   pretty output ([`init_logging`])
//! - **Metrics**: counters recorded through the `metrics` facade
//!   ([`record_bind`], [`record_schema_analyzed`])
//!
//! # Example
//!
//! ```rust,ignore
//! use recordbind_telemetry::{init_telemetry, LogConfig};
//!
//! init_telemetry(&LogConfig::production())?;
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;
pub mod metrics;

pub use crate::error::TelemetryError;
pub use crate::logging::{create_env_filter, init_logging, LogConfig, LogFormat};
pub use crate::metrics::{
    describe_metrics, record_bind, record_schema_analyzed, BindOutcome, BIND_TOTAL,
    SCHEMA_ANALYZED_TOTAL,
};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Installs logging and registers metric descriptions.
///
/// # Errors
///
/// Returns `TelemetryError` if logging cannot be initialized.
pub fn init_telemetry(config: &LogConfig) -> TelemetryResult<()> {
    init_logging(config)?;
    describe_metrics();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_with_logging_disabled() {
        let config = LogConfig {
            enabled: false,
            ..LogConfig::default()
        };
        assert!(init_telemetry(&config).is_ok());
    }
}
