//! HashiCorp Vault item client.
//!
//! Reads items from Vault's KV v2 secrets engine. A vault item
//! `container_id`/`item_id` maps to the KV path `<container_id>/<item_id>`
//! under the configured mount; the secret's data map is the item's fields.
//!
//! # Configuration
//!
//! - `TLS_MATERIAL_VAULT_ADDR` or `VAULT_ADDR` (required to enable Vault)
//! - `TLS_MATERIAL_VAULT_TOKEN` or `VAULT_TOKEN`
//! - `TLS_MATERIAL_VAULT_NAMESPACE` or `VAULT_NAMESPACE`
//! - `TLS_MATERIAL_VAULT_KV_MOUNT` (default: "secret")
//!
//! # Blocking
//!
//! The client owns a current-thread Tokio runtime and blocks on each request,
//! keeping the material engine synchronous. Do not call it from a thread that
//! is already driving a Tokio runtime; use `spawn_blocking` there.
//!
//! # Security
//!
//! - Tokens are never logged
//! - Field values are never logged

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use vaultrs::client::VaultClientSettingsBuilder;
use vaultrs::kv2;

use super::client::{ItemFields, VaultClient};
use super::error::{Result, SecretsError};

/// Configuration for the Vault item client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultBackendConfig {
    /// Vault server address
    pub address: String,
    /// Vault authentication token
    pub token: Option<String>,
    /// Vault namespace (for Enterprise)
    pub namespace: Option<String>,
    /// KV v2 mount path (default: "secret")
    #[serde(default = "default_kv_mount")]
    pub kv_mount_path: String,
}

fn default_kv_mount() -> String {
    "secret".to_string()
}

impl VaultBackendConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` when no Vault address is configured.
    pub fn from_env() -> Option<Self> {
        let address = std::env::var("TLS_MATERIAL_VAULT_ADDR")
            .or_else(|_| std::env::var("VAULT_ADDR"))
            .ok()?;

        let token = std::env::var("TLS_MATERIAL_VAULT_TOKEN")
            .or_else(|_| std::env::var("VAULT_TOKEN"))
            .ok();

        let namespace = std::env::var("TLS_MATERIAL_VAULT_NAMESPACE")
            .or_else(|_| std::env::var("VAULT_NAMESPACE"))
            .ok();

        let kv_mount_path =
            std::env::var("TLS_MATERIAL_VAULT_KV_MOUNT").unwrap_or_else(|_| default_kv_mount());

        Some(Self { address, token, namespace, kv_mount_path })
    }
}

/// Vault KV v2 item client
pub struct VaultKvClient {
    client: vaultrs::client::VaultClient,
    kv_mount_path: String,
    runtime: tokio::runtime::Runtime,
}

impl std::fmt::Debug for VaultKvClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultKvClient")
            .field("kv_mount_path", &self.kv_mount_path)
            .field("client", &"[VaultClient]")
            .finish()
    }
}

impl VaultKvClient {
    /// Create a new Vault client with the given configuration
    pub fn new(config: VaultBackendConfig) -> Result<Self> {
        let mut settings_builder = VaultClientSettingsBuilder::default();
        settings_builder.address(&config.address);

        if let Some(ref token) = config.token {
            settings_builder.token(token);
        }

        if let Some(ref namespace) = config.namespace {
            settings_builder.namespace(Some(namespace.clone()));
        }

        let settings = settings_builder.build().map_err(|e| {
            SecretsError::config_error(format!("Invalid Vault configuration: {}", e))
        })?;

        let client = vaultrs::client::VaultClient::new(settings).map_err(|e| {
            SecretsError::config_error(format!("Failed to create Vault client: {}", e))
        })?;

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

        info!(
            address = %config.address,
            kv_mount = %config.kv_mount_path,
            "Initialized Vault item client"
        );

        Ok(Self { client, kv_mount_path: config.kv_mount_path, runtime })
    }

    /// Create a client from environment configuration
    pub fn from_env() -> Result<Option<Self>> {
        VaultBackendConfig::from_env().map(Self::new).transpose()
    }

    /// KV path of an item within the mount
    fn item_path(container_id: &str, item_id: &str) -> String {
        format!("{}/{}", container_id.trim_matches('/'), item_id.trim_matches('/'))
    }
}

impl VaultClient for VaultKvClient {
    fn load_item(&self, container_id: &str, item_id: &str) -> Result<ItemFields> {
        let path = Self::item_path(container_id, item_id);

        debug!(path = %path, kv_mount = %self.kv_mount_path, "Fetching item from Vault");

        self.runtime
            .block_on(kv2::read::<ItemFields>(&self.client, &self.kv_mount_path, &path))
            .map_err(|e| {
                debug!(path = %path, error = %e, "Failed to fetch item from Vault");
                SecretsError::not_found(format!("{} ({})", path, e))
            })
    }
}
