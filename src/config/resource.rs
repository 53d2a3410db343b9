//! Per-resource settings cascade.
//!
//! A resource is identified by its name. Each setting is taken from, in
//! order: an explicit override, the artifact's namespace section
//! (`ssl_key` / `ssl_cert`), the resource namespace itself, and finally a
//! built-in default. The cascade runs once, in [`ResourceSettings::resolve`].

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::attributes::{lookup_path, Platform};
use crate::errors::{MaterialError, Result};
use crate::material::{ArtifactKind, ArtifactSpec, ItemLocator, SourceKind};

/// Explicit settings for one artifact; unset fields fall through the cascade
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactOverrides {
    pub name: Option<String>,
    pub dir: Option<PathBuf>,
    pub path: Option<PathBuf>,
    pub source: Option<String>,
    pub bag: Option<String>,
    pub item: Option<String>,
    pub item_key: Option<String>,
    pub encrypted: Option<bool>,
    pub secret_file: Option<PathBuf>,
}

impl ArtifactOverrides {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn bag(mut self, bag: impl Into<String>) -> Self {
        self.bag = Some(bag.into());
        self
    }

    pub fn item(mut self, item: impl Into<String>) -> Self {
        self.item = Some(item.into());
        self
    }

    pub fn item_key(mut self, item_key: impl Into<String>) -> Self {
        self.item_key = Some(item_key.into());
        self
    }

    pub fn encrypted(mut self, encrypted: bool) -> Self {
        self.encrypted = Some(encrypted);
        self
    }

    pub fn secret_file(mut self, secret_file: impl Into<PathBuf>) -> Self {
        self.secret_file = Some(secret_file.into());
        self
    }
}

/// Settings for one TLS resource before the cascade runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSettings {
    name: String,
    namespace: Vec<String>,
    server_name: Option<String>,
    key: ArtifactOverrides,
    cert: ArtifactOverrides,
}

impl ResourceSettings {
    /// New settings whose namespace is the top-level attribute `name`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            namespace: vec![name.clone()],
            name,
            server_name: None,
            key: ArtifactOverrides::default(),
            cert: ArtifactOverrides::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of keys into the attribute tree where this resource's attributes live.
    pub fn namespace<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.namespace = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn server_name(mut self, server_name: impl Into<String>) -> Self {
        self.server_name = Some(server_name.into());
        self
    }

    /// Adjust the key's overrides.
    pub fn key(mut self, f: impl FnOnce(ArtifactOverrides) -> ArtifactOverrides) -> Self {
        self.key = f(self.key);
        self
    }

    /// Adjust the certificate's overrides.
    pub fn cert(mut self, f: impl FnOnce(ArtifactOverrides) -> ArtifactOverrides) -> Self {
        self.cert = f(self.cert);
        self
    }

    // Shared setters apply to both artifacts.

    pub fn dir(self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        self.key(|k| k.dir(dir.clone())).cert(|c| c.dir(dir))
    }

    pub fn source(self, source: impl Into<String>) -> Self {
        let source = source.into();
        self.key(|k| k.source(source.clone())).cert(|c| c.source(source))
    }

    pub fn bag(self, bag: impl Into<String>) -> Self {
        let bag = bag.into();
        self.key(|k| k.bag(bag.clone())).cert(|c| c.bag(bag))
    }

    pub fn item(self, item: impl Into<String>) -> Self {
        let item = item.into();
        self.key(|k| k.item(item.clone())).cert(|c| c.item(item))
    }

    pub fn encrypted(self, encrypted: bool) -> Self {
        self.key(|k| k.encrypted(encrypted)).cert(|c| c.encrypted(encrypted))
    }

    pub fn secret_file(self, secret_file: impl Into<PathBuf>) -> Self {
        let secret_file = secret_file.into();
        self.key(|k| k.secret_file(secret_file.clone())).cert(|c| c.secret_file(secret_file))
    }

    /// Run the cascade against `tree`.
    ///
    /// `default_secret_file` is the last fallback for encrypted items.
    pub fn resolve(
        &self,
        tree: &Value,
        platform: Platform,
        default_secret_file: Option<&Path>,
    ) -> Result<ResolvedSettings> {
        let namespace = lookup_path(tree, self.namespace.as_slice());

        let server_name = self
            .server_name
            .clone()
            .or_else(|| namespace.and_then(|ns| string_at(ns, &["server_name"])))
            .or_else(|| string_at(tree, &["fqdn"]))
            .ok_or_else(|| {
                MaterialError::config(format!("server_name is required for resource {}", self.name))
            })?;

        let key = ArtifactCascade {
            kind: ArtifactKind::Key,
            section: "ssl_key",
            extension: "key",
            default_dir: platform.key_dir(),
        }
        .resolve(&self.name, &self.key, namespace, default_secret_file)?;

        let cert = ArtifactCascade {
            kind: ArtifactKind::Certificate,
            section: "ssl_cert",
            extension: "pem",
            default_dir: platform.cert_dir(),
        }
        .resolve(&self.name, &self.cert, namespace, default_secret_file)?;

        Ok(ResolvedSettings { server_name, key, cert })
    }
}

struct ArtifactCascade {
    kind: ArtifactKind,
    section: &'static str,
    extension: &'static str,
    default_dir: &'static str,
}

impl ArtifactCascade {
    /// `<section>.<attr>` in the namespace, else `<attr>`.
    fn read<'a>(&self, namespace: Option<&'a Value>, attr: &str) -> Option<&'a Value> {
        let ns = namespace?;
        lookup_path(ns, &[self.section, attr]).or_else(|| lookup_path(ns, &[attr]))
    }

    fn resolve(
        &self,
        resource_name: &str,
        overrides: &ArtifactOverrides,
        namespace: Option<&Value>,
        default_secret_file: Option<&Path>,
    ) -> Result<ArtifactSettings> {
        let read_string =
            |attr: &str| self.read(namespace, attr).and_then(Value::as_str).map(str::to_string);

        let path = match &overrides.path {
            Some(path) => path.clone(),
            None => {
                let name = overrides
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("{}.{}", resource_name, self.extension));
                let dir = overrides.dir.clone().unwrap_or_else(|| PathBuf::from(self.default_dir));
                dir.join(name)
            }
        };

        let source = overrides.source.clone().or_else(|| read_string("source")).ok_or_else(|| {
            MaterialError::config(format!("No source configured for SSL {}", self.kind))
        })?;

        let item_key = overrides.item_key.clone().or_else(|| {
            namespace.and_then(|ns| string_at(ns, &[self.section, "item_key"]))
        });

        let encrypted = overrides
            .encrypted
            .or_else(|| self.read(namespace, "encrypted").map(is_truthy))
            .unwrap_or(false);

        let secret_file = overrides
            .secret_file
            .clone()
            .or_else(|| read_string("secret_file").map(PathBuf::from))
            .or_else(|| default_secret_file.map(Path::to_path_buf));

        Ok(ArtifactSettings {
            path,
            source,
            bag: overrides.bag.clone().or_else(|| read_string("bag")),
            item: overrides.item.clone().or_else(|| read_string("item")),
            item_key,
            encrypted,
            secret_file,
        })
    }
}

fn string_at(tree: &Value, keys: &[&str]) -> Option<String> {
    lookup_path(tree, keys).and_then(Value::as_str).map(str::to_string)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::String(text) => matches!(text.to_ascii_lowercase().as_str(), "true" | "yes" | "1"),
        Value::Number(n) => n.as_i64() == Some(1),
        _ => false,
    }
}

/// Cascaded settings for one artifact.
///
/// `source` is kept as configured text; it is only checked against the known
/// source kinds when the artifact is about to be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSettings {
    pub path: PathBuf,
    pub source: String,
    pub bag: Option<String>,
    pub item: Option<String>,
    pub item_key: Option<String>,
    pub encrypted: bool,
    pub secret_file: Option<PathBuf>,
}

impl ArtifactSettings {
    /// Build the spec for this artifact.
    ///
    /// Fails with [`MaterialError::UnknownSource`] for an unrecognized source and
    /// [`MaterialError::Config`] when an item source lacks coordinates.
    pub fn to_spec(&self, artifact: ArtifactKind) -> Result<ArtifactSpec> {
        let kind: SourceKind = self
            .source
            .parse()
            .map_err(|_| MaterialError::unknown_source(artifact, self.source.as_str()))?;

        Ok(match kind {
            SourceKind::File => ArtifactSpec::file(&self.path),
            SourceKind::SelfSigned => ArtifactSpec::self_signed(&self.path),
            SourceKind::Vault => ArtifactSpec::vault(self.item_locator(artifact, kind)?),
            SourceKind::SecretStore if self.encrypted => ArtifactSpec::encrypted_secret_store(
                self.item_locator(artifact, kind)?,
                self.secret_file.clone(),
            ),
            SourceKind::SecretStore => {
                ArtifactSpec::secret_store(self.item_locator(artifact, kind)?)
            }
        })
    }

    pub fn source_kind(&self) -> Option<SourceKind> {
        self.source.parse().ok()
    }

    fn item_locator(&self, artifact: ArtifactKind, kind: SourceKind) -> Result<ItemLocator> {
        match (&self.bag, &self.item, &self.item_key) {
            (Some(bag), Some(item), Some(item_key)) => Ok(ItemLocator::new(bag, item, item_key)),
            _ => Err(MaterialError::config(format!(
                "SSL {} from {} needs bag, item and item_key",
                artifact, kind
            ))),
        }
    }
}

/// Cascaded settings for a resource, ready for resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub server_name: String,
    pub key: ArtifactSettings,
    pub cert: ArtifactSettings,
}

impl ResolvedSettings {
    /// True when either artifact is read from Vault.
    pub fn depends_on_vault(&self) -> bool {
        self.key.source_kind() == Some(SourceKind::Vault)
            || self.cert.source_kind() == Some(SourceKind::Vault)
    }

    /// Two resources are the same when they write the same files for the same name.
    pub fn is_same_resource(&self, other: &Self) -> bool {
        self.key.path == other.key.path
            && self.cert.path == other.cert.path
            && self.server_name == other.server_name
    }
}
