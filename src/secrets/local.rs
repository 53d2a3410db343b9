//! Directory-backed secret store.
//!
//! Items live at `<root>/<container_id>/<item_id>.json`, one JSON object per
//! item. Encrypted items use the envelope format described in
//! [`encrypted`](super::encrypted).

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::client::{ItemFields, SecretStoreClient};
use super::encrypted::{decrypt_item_fields, load_secret};
use super::error::{Result, SecretsError};

/// Default root directory for locally stored items.
pub const DEFAULT_STORE_ROOT: &str = "/var/lib/tls-material/data_bags";

/// Secret store reading JSON items from a directory tree.
#[derive(Debug, Clone)]
pub struct LocalSecretStore {
    root: PathBuf,
}

impl LocalSecretStore {
    /// Create a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the document holding `item_id` in `container_id`.
    pub fn item_path(&self, container_id: &str, item_id: &str) -> Result<PathBuf> {
        validate_component(container_id)?;
        validate_component(item_id)?;
        Ok(self.root.join(container_id).join(format!("{}.json", item_id)))
    }
}

impl Default for LocalSecretStore {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_ROOT)
    }
}

impl SecretStoreClient for LocalSecretStore {
    fn load_item(
        &self,
        container_id: &str,
        item_id: &str,
        secret_file: Option<&Path>,
    ) -> Result<ItemFields> {
        let key = format!("{}/{}", container_id, item_id);
        let path = self.item_path(container_id, item_id)?;

        debug!(
            item = %key,
            path = %path.display(),
            encrypted = secret_file.is_some(),
            "Loading secret store item"
        );

        let raw = fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SecretsError::not_found(key.clone()),
            _ => SecretsError::IoError(e),
        })?;

        let fields: ItemFields = serde_json::from_slice(&raw)?;

        match secret_file {
            Some(secret_path) => {
                let secret = load_secret(secret_path)?;
                decrypt_item_fields(&key, fields, secret.expose_secret())
            }
            None => Ok(fields),
        }
    }
}

// Container and item ids are single path components.
fn validate_component(component: &str) -> Result<()> {
    if component.is_empty()
        || component == "."
        || component == ".."
        || component.contains('/')
        || component.contains('\\')
    {
        return Err(SecretsError::invalid_item(component, "must be a single path component"));
    }
    Ok(())
}
