//! Telemetry configuration from environment variables.

use std::env;

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name stamped on every log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error)
    pub log_level: String,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "estatechain".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `EC_SERVICE_NAME`: Service name (default: estatechain)
    /// - `EC_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `EC_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("EC_SERVICE_NAME").unwrap_or_else(|_| "estatechain".to_string()),

            log_level: env::var("EC_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            json_logs: env::var("EC_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),
        }
    }
}
