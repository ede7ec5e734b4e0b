//! # Estate Telemetry
//!
//! Structured logging for EstateChain services.
//!
//! Logs are emitted through `tracing` with consistent fields (`subsystem`,
//! `token_id`, `tx_hash`, ...) so a log aggregator can parse them. JSON
//! output is used in containers, pretty output in development.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use estate_telemetry::{TelemetryConfig, init_telemetry};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_telemetry(&config).expect("Failed to init telemetry");
//!     // Application code runs here; logs are now structured.
//! }
//! ```

mod config;

pub use config::TelemetryConfig;

use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Telemetry initialization errors.
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The log-level filter string could not be parsed.
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    /// A global subscriber was already installed.
    #[error("Failed to install subscriber: {0}")]
    SubscriberInit(String),
}

/// Initialize the global tracing subscriber.
///
/// Honors `RUST_LOG` when set, falling back to the configured level. Call
/// once at process startup; repeated calls fail with `SubscriberInit`.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::InvalidFilter(e.to_string()))?;

    let fmt_layer = if config.json_logs {
        // JSON output for containers/production
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        // Pretty output for development
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_ansi(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| TelemetryError::SubscriberInit(e.to_string()))?;

    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_service_name() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "estatechain");
    }
}
