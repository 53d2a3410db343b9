//! Node attribute trees and platform defaults.
//!
//! Attributes are a nested mapping loaded from YAML or JSON. Lookups walk
//! the tree by key and yield nothing on any miss instead of failing.

use std::path::Path;

use serde_json::Value;

use crate::errors::{MaterialError, Result};

/// Walk `tree` along `keys`.
///
/// Returns `None` when a key is absent or an intermediate node is not a
/// mapping. An empty key list returns the tree itself.
pub fn lookup_path<'a, K: AsRef<str>>(tree: &'a Value, keys: &[K]) -> Option<&'a Value> {
    keys.iter().try_fold(tree, |node, key| node.as_object()?.get(key.as_ref()))
}

/// Load an attribute tree from a `.json`, `.yaml` or `.yml` file.
///
/// Files with any other extension are parsed as YAML, which also accepts JSON.
pub fn load_attributes(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).map_err(|e| MaterialError::io(path, e))?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&content).map_err(|e| {
            MaterialError::config(format!("Invalid JSON attributes in {}: {}", path.display(), e))
        }),
        _ => parse_yaml_attributes(&content).map_err(|e| {
            MaterialError::config(format!("Invalid YAML attributes in {}: {}", path.display(), e))
        }),
    }
}

/// Parse YAML text into an attribute tree.
pub fn parse_yaml_attributes(content: &str) -> std::result::Result<Value, serde_yaml::Error> {
    serde_yaml::from_str(content)
}

/// Operating system family that decides default key and certificate directories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// debian, ubuntu
    Debian,
    /// redhat, centos, fedora, scientific, amazon
    RedHat,
    /// Anything else
    Other,
}

impl Platform {
    pub fn from_name(name: &str) -> Self {
        match name {
            "debian" | "ubuntu" => Self::Debian,
            "redhat" | "centos" | "fedora" | "scientific" | "amazon" => Self::RedHat,
            _ => Self::Other,
        }
    }

    /// Platform named by the tree's top-level `platform` attribute.
    pub fn from_attributes(tree: &Value) -> Self {
        lookup_path(tree, &["platform"])
            .and_then(Value::as_str)
            .map(Self::from_name)
            .unwrap_or(Self::Other)
    }

    pub fn key_dir(&self) -> &'static str {
        match self {
            Self::Debian => "/etc/ssl/private",
            Self::RedHat => "/etc/pki/tls/private",
            Self::Other => "/etc",
        }
    }

    pub fn cert_dir(&self) -> &'static str {
        match self {
            Self::Debian => "/etc/ssl/certs",
            Self::RedHat => "/etc/pki/tls/certs",
            Self::Other => "/etc",
        }
    }
}
