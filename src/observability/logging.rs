//! # Structured Logging
//!
//! Installs a `tracing-subscriber` fmt subscriber filtered by `EnvFilter`.
//! Material resolution logs the chosen source, reuse and regeneration
//! decisions with structured fields; key bytes and item values never appear
//! in log output.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::errors::{MaterialError, Result};

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = MaterialError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(MaterialError::config(format!("Invalid log format: {}", other))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, e.g. `info` or `tls_material=debug`
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Text }
    }
}

impl LoggingConfig {
    /// Create configuration from environment variables
    ///
    /// `TLS_MATERIAL_LOG_LEVEL` falls back to `RUST_LOG`, then `info`.
    /// `TLS_MATERIAL_LOG_FORMAT` is `text` (default) or `json`.
    pub fn from_env() -> Result<Self> {
        let level = std::env::var("TLS_MATERIAL_LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());

        let format = match std::env::var("TLS_MATERIAL_LOG_FORMAT") {
            Ok(value) => value.parse()?,
            Err(_) => LogFormat::default(),
        };

        Ok(Self { level, format })
    }

    fn env_filter(&self) -> Result<EnvFilter> {
        EnvFilter::try_new(&self.level)
            .map_err(|e| {
                MaterialError::config(format!("Invalid log level '{}': {}", self.level, e))
            })
    }
}

/// Install the global subscriber.
///
/// Returns `Ok(false)` when a subscriber was already installed elsewhere,
/// for example by a test harness.
pub fn init_logging(config: &LoggingConfig) -> Result<bool> {
    let filter = config.env_filter()?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = match config.format {
        LogFormat::Text => builder.try_init().is_ok(),
        LogFormat::Json => builder.json().try_init().is_ok(),
    };

    if installed {
        tracing::debug!(level = %config.level, format = ?config.format, "Logging initialized");
    }

    Ok(installed)
}
