//! # Engine Settings
//!
//! Process-wide configuration for the material engine, read from the
//! environment.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::secrets::local::DEFAULT_STORE_ROOT;
use crate::secrets::VaultBackendConfig;

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Secret file used for encrypted items that name none of their own
    pub default_secret_file: Option<PathBuf>,

    /// Root directory of the local secret store
    pub data_bag_path: PathBuf,

    /// Vault connection, absent when no address is configured
    pub vault: Option<VaultBackendConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_secret_file: None,
            data_bag_path: PathBuf::from(DEFAULT_STORE_ROOT),
            vault: None,
        }
    }
}

impl EngineConfig {
    /// Create configuration from environment variables
    ///
    /// - `TLS_MATERIAL_SECRET_FILE`
    /// - `TLS_MATERIAL_DATA_BAG_PATH` (default `/var/lib/tls-material/data_bags`)
    /// - the Vault variables read by [`VaultBackendConfig::from_env`]
    pub fn from_env() -> Self {
        let default_secret_file = std::env::var("TLS_MATERIAL_SECRET_FILE")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let data_bag_path = std::env::var("TLS_MATERIAL_DATA_BAG_PATH")
            .unwrap_or_else(|_| DEFAULT_STORE_ROOT.to_string());

        Self {
            default_secret_file,
            data_bag_path: PathBuf::from(data_bag_path),
            vault: VaultBackendConfig::from_env(),
        }
    }
}
