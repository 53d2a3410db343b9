//! Artifact specifications and resolution output.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::errors::{MaterialError, Result};
use crate::secrets::{item_location, SecretBytes};

/// The two artifacts resolved for a server identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Private key
    Key,
    /// Certificate
    Certificate,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::Certificate => "certificate",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where an artifact's content comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Local file, must exist
    File,
    /// Secret store item, optionally encrypted
    SecretStore,
    /// Vault item
    Vault,
    /// Local file if present, generated otherwise
    SelfSigned,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::SecretStore => "secret_store",
            Self::Vault => "vault",
            Self::SelfSigned => "self_signed",
        }
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "file" => Ok(Self::File),
            "secret_store" | "secret-store" | "data-bag" | "data_bag" => Ok(Self::SecretStore),
            "vault" | "chef-vault" | "chef_vault" => Ok(Self::Vault),
            "self_signed" | "self-signed" => Ok(Self::SelfSigned),
            _ => Err(format!("Unknown source kind: {}", s)),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coordinates of a field inside a stored item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemLocator {
    pub container_id: String,
    pub item_id: String,
    pub item_field: String,
}

impl ItemLocator {
    pub fn new(
        container_id: impl Into<String>,
        item_id: impl Into<String>,
        item_field: impl Into<String>,
    ) -> Self {
        Self {
            container_id: container_id.into(),
            item_id: item_id.into(),
            item_field: item_field.into(),
        }
    }
}

impl fmt::Display for ItemLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&item_location(&self.container_id, &self.item_id, &self.item_field))
    }
}

/// Fully materialized configuration for one artifact.
///
/// Unknown source kinds are rejected before a spec exists, see
/// [`ArtifactSettings::to_spec`](crate::config::ArtifactSettings::to_spec).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactSpec {
    File { path: PathBuf },
    SecretStore { item: ItemLocator, is_encrypted: bool, secret_file_path: Option<PathBuf> },
    Vault { item: ItemLocator },
    SelfSigned { path: PathBuf },
}

impl ArtifactSpec {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    pub fn self_signed(path: impl Into<PathBuf>) -> Self {
        Self::SelfSigned { path: path.into() }
    }

    pub fn vault(item: ItemLocator) -> Self {
        Self::Vault { item }
    }

    /// Plain (unencrypted) secret store item.
    pub fn secret_store(item: ItemLocator) -> Self {
        Self::SecretStore { item, is_encrypted: false, secret_file_path: None }
    }

    /// Encrypted secret store item. With no `secret_file_path` the reader's
    /// default secret file is used.
    pub fn encrypted_secret_store(item: ItemLocator, secret_file_path: Option<PathBuf>) -> Self {
        Self::SecretStore { item, is_encrypted: true, secret_file_path }
    }

    pub fn source_kind(&self) -> SourceKind {
        match self {
            Self::File { .. } => SourceKind::File,
            Self::SecretStore { .. } => SourceKind::SecretStore,
            Self::Vault { .. } => SourceKind::Vault,
            Self::SelfSigned { .. } => SourceKind::SelfSigned,
        }
    }

    /// Local path, for the kinds that have one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File { path } | Self::SelfSigned { path } => Some(path),
            _ => None,
        }
    }

    /// Backend coordinates for logs and errors.
    pub fn location(&self) -> String {
        match self {
            Self::File { path } | Self::SelfSigned { path } => path.display().to_string(),
            Self::SecretStore { item, .. } | Self::Vault { item } => item.to_string(),
        }
    }
}

/// Common name a self-signed certificate is bound to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ServerName(String);

impl ServerName {
    /// Fails on an empty or whitespace-only name.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(MaterialError::config("server_name must not be empty"));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolved key and certificate, both PEM text and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMaterial {
    key: SecretBytes,
    cert: Vec<u8>,
}

impl ResolvedMaterial {
    pub(crate) fn new(key: SecretBytes, cert: Vec<u8>) -> Self {
        Self { key, cert }
    }

    pub fn key_bytes(&self) -> &[u8] {
        self.key.expose_secret()
    }

    pub fn cert_bytes(&self) -> &[u8] {
        &self.cert
    }

    pub fn into_parts(self) -> (SecretBytes, Vec<u8>) {
        (self.key, self.cert)
    }
}
