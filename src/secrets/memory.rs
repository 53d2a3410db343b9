//! In-memory item store.
//!
//! Implements both [`SecretStoreClient`] and [`VaultClient`] over a map of
//! items, for embedding and tests. Encrypted items are stored as envelopes
//! and decrypted on load exactly like [`LocalSecretStore`](super::LocalSecretStore).

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use super::client::{ItemFields, SecretStoreClient, VaultClient};
use super::encrypted::{decrypt_item_fields, load_secret};
use super::error::{Result, SecretsError};

/// Thread-safe map of `(container_id, item_id)` to item fields.
#[derive(Debug, Default)]
pub struct InMemoryItemStore {
    items: RwLock<HashMap<(String, String), ItemFields>>,
}

impl InMemoryItemStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an item.
    pub fn insert(
        &self,
        container_id: impl Into<String>,
        item_id: impl Into<String>,
        fields: ItemFields,
    ) {
        let mut items = self.items.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        items.insert((container_id.into(), item_id.into()), fields);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_item(
        self,
        container_id: impl Into<String>,
        item_id: impl Into<String>,
        fields: ItemFields,
    ) -> Self {
        self.insert(container_id, item_id, fields);
        self
    }

    fn get(&self, container_id: &str, item_id: &str) -> Result<ItemFields> {
        let items = self.items.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        items
            .get(&(container_id.to_string(), item_id.to_string()))
            .cloned()
            .ok_or_else(|| SecretsError::not_found(format!("{}/{}", container_id, item_id)))
    }
}

impl SecretStoreClient for InMemoryItemStore {
    fn load_item(
        &self,
        container_id: &str,
        item_id: &str,
        secret_file: Option<&Path>,
    ) -> Result<ItemFields> {
        let fields = self.get(container_id, item_id)?;
        match secret_file {
            Some(path) => {
                let secret = load_secret(path)?;
                let key = format!("{}/{}", container_id, item_id);
                decrypt_item_fields(&key, fields, secret.expose_secret())
            }
            None => Ok(fields),
        }
    }
}

impl VaultClient for InMemoryItemStore {
    fn load_item(&self, container_id: &str, item_id: &str) -> Result<ItemFields> {
        self.get(container_id, item_id)
    }
}
