//! Source reader: retrieval of raw artifact bytes.
//!
//! `file` and `self_signed` specs read a local path. `secret_store` and
//! `vault` specs read one field of an external item. The reader never
//! generates content.
//!
//! Outcomes are `Ok(Some(bytes))`, `Ok(None)` for "not found", or `Err` for a
//! local I/O failure other than a missing file. Item backends are
//! best-effort: every failure they report (missing item, missing field,
//! decryption, connectivity) collapses into `Ok(None)`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use super::spec::{ArtifactSpec, ItemLocator};
use crate::errors::{MaterialError, Result};
use crate::secrets::{ItemFields, SecretStoreClient, VaultClient};

/// Filesystem access used by the reader
pub trait FileSystem: Send + Sync {
    /// `Ok(false)` only when the path is confirmed absent.
    fn exists(&self, path: &Path) -> std::io::Result<bool>;

    fn read_all(&self, path: &Path) -> std::io::Result<Vec<u8>>;
}

/// [`FileSystem`] over `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn exists(&self, path: &Path) -> std::io::Result<bool> {
        path.try_exists()
    }

    fn read_all(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// Reads artifact bytes from the configured collaborators
#[derive(Clone)]
pub struct SourceReader {
    fs: Arc<dyn FileSystem>,
    secret_store: Arc<dyn SecretStoreClient>,
    vault: Option<Arc<dyn VaultClient>>,
    default_secret_file: Option<PathBuf>,
}

impl std::fmt::Debug for SourceReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceReader")
            .field("vault_configured", &self.vault.is_some())
            .field("default_secret_file", &self.default_secret_file)
            .finish()
    }
}

impl SourceReader {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        secret_store: Arc<dyn SecretStoreClient>,
        vault: Option<Arc<dyn VaultClient>>,
        default_secret_file: Option<PathBuf>,
    ) -> Self {
        Self { fs, secret_store, vault, default_secret_file }
    }

    /// Fetch the bytes an artifact spec points at.
    pub fn read(&self, spec: &ArtifactSpec) -> Result<Option<Vec<u8>>> {
        let content = match spec {
            ArtifactSpec::File { path } | ArtifactSpec::SelfSigned { path } => {
                self.read_path(path)?
            }
            ArtifactSpec::SecretStore { item, is_encrypted, secret_file_path } => {
                self.read_secret_store(item, *is_encrypted, secret_file_path.as_deref())
            }
            ArtifactSpec::Vault { item } => self.read_vault(item),
        };

        // Empty content never counts as material.
        Ok(content.filter(|bytes| !bytes.is_empty()))
    }

    /// Read a whole local file; a missing path is `None`.
    pub fn read_path(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        match self.fs.exists(path) {
            Ok(true) => {}
            Ok(false) => {
                debug!(path = %path.display(), "Source path does not exist");
                return Ok(None);
            }
            Err(e) => return Err(MaterialError::io(path, e)),
        }

        match self.fs.read_all(path) {
            Ok(bytes) => Ok(Some(bytes)),
            // Removed between the existence check and the read.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(MaterialError::io(path, e)),
        }
    }

    fn read_secret_store(
        &self,
        item: &ItemLocator,
        is_encrypted: bool,
        secret_file_path: Option<&Path>,
    ) -> Option<Vec<u8>> {
        let secret_file = if is_encrypted {
            let secret_file = secret_file_path.or(self.default_secret_file.as_deref());
            if secret_file.is_none() {
                warn!(item = %item, "Encrypted item requested but no secret file is configured");
                return None;
            }
            secret_file
        } else {
            None
        };

        match self.secret_store.load_item(&item.container_id, &item.item_id, secret_file) {
            Ok(fields) => extract_field(&fields, item),
            Err(e) => {
                debug!(item = %item, error = %e, "Secret store lookup failed");
                None
            }
        }
    }

    fn read_vault(&self, item: &ItemLocator) -> Option<Vec<u8>> {
        let Some(vault) = self.vault.as_ref() else {
            warn!(item = %item, "Vault source requested but no vault client is configured");
            return None;
        };

        match vault.load_item(&item.container_id, &item.item_id) {
            Ok(fields) => extract_field(&fields, item),
            Err(e) => {
                debug!(item = %item, error = %e, "Vault lookup failed");
                None
            }
        }
    }
}

fn extract_field(fields: &ItemFields, item: &ItemLocator) -> Option<Vec<u8>> {
    match fields.get(&item.item_field) {
        Some(serde_json::Value::String(value)) => Some(value.clone().into_bytes()),
        Some(_) => {
            debug!(item = %item, "Item field is not a string");
            None
        }
        None => {
            debug!(item = %item, "Item field is missing");
            None
        }
    }
}
