//! Runtime configuration from environment variables.

use mirror_store::MirrorDbConfig;
use shared_types::Address;
use std::env;
use std::net::SocketAddr;
use thiserror::Error;

/// Configuration errors surfaced at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable held an unparseable value.
    #[error("Invalid value for {var}: {value}")]
    Invalid {
        /// The offending variable.
        var: &'static str,
        /// The value it held.
        value: String,
    },
}

/// Gateway runtime configuration.
///
/// # Environment Variables
///
/// - `EC_BIND_ADDR`: listen address (default `0.0.0.0:8080`)
/// - `EC_ADMIN_TOKEN`: bearer token for admin routes; unset disables them
/// - `EC_DB_PATH`: RocksDB directory (default `./data/estatechain`)
/// - `EC_FEE_BPS`: escrow fee rate in basis points (default 250)
/// - `EC_FEE_RECIPIENT`: fee recipient address (default zero address)
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Listen address.
    pub bind_addr: SocketAddr,
    /// Admin bearer token. `None` rejects every admin request.
    pub admin_token: Option<String>,
    /// RocksDB directory.
    pub db_path: String,
    /// Fee rate in basis points, applied to newly created deals.
    pub fee_bps: u32,
    /// Where completed-deal fees go.
    pub fee_recipient: Address,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            admin_token: None,
            db_path: "./data/estatechain".to_string(),
            fee_bps: 250,
            fee_recipient: Address::ZERO,
        }
    }
}

impl RuntimeConfig {
    /// Read configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bind_addr = match env::var("EC_BIND_ADDR") {
            Ok(v) => v.parse().map_err(|_| ConfigError::Invalid {
                var: "EC_BIND_ADDR",
                value: v,
            })?,
            Err(_) => defaults.bind_addr,
        };

        let fee_bps = match env::var("EC_FEE_BPS") {
            Ok(v) => v.parse().map_err(|_| ConfigError::Invalid {
                var: "EC_FEE_BPS",
                value: v,
            })?,
            Err(_) => defaults.fee_bps,
        };

        let fee_recipient = match env::var("EC_FEE_RECIPIENT") {
            Ok(v) => v.parse().map_err(|_| ConfigError::Invalid {
                var: "EC_FEE_RECIPIENT",
                value: v,
            })?,
            Err(_) => defaults.fee_recipient,
        };

        Ok(Self {
            bind_addr,
            admin_token: env::var("EC_ADMIN_TOKEN").ok().filter(|t| !t.is_empty()),
            db_path: env::var("EC_DB_PATH").unwrap_or(defaults.db_path),
            fee_bps,
            fee_recipient,
        })
    }

    /// The store configuration this runtime config implies.
    pub fn db_config(&self) -> MirrorDbConfig {
        MirrorDbConfig {
            path: self.db_path.clone(),
            ..MirrorDbConfig::default()
        }
    }
}
