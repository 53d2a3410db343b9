//! Material resolution engine.
//!
//! Resolves the key first and the certificate second, handing the resolved
//! key and the server identity to the certificate step. The first failure
//! aborts the call; nothing is cached between calls.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, info_span};

use super::resolver::{ArtifactResolver, ResolveContext};
use super::source::{FileSystem, LocalFileSystem, SourceReader};
use super::spec::{ArtifactKind, ArtifactSpec, ResolvedMaterial, ServerName};
use crate::config::{EngineConfig, ResolvedSettings};
use crate::errors::{MaterialError, Result};
use crate::secrets::{
    InMemoryItemStore, LocalSecretStore, SecretBytes, SecretStoreClient, VaultClient, VaultKvClient,
};

/// Top-level resolver for a key and certificate pair
#[derive(Debug, Clone)]
pub struct MaterialEngine {
    resolver: ArtifactResolver,
}

impl MaterialEngine {
    pub fn builder() -> MaterialEngineBuilder {
        MaterialEngineBuilder::default()
    }

    /// Build an engine over the local filesystem, a [`LocalSecretStore`]
    /// and, when an address is configured, a [`VaultKvClient`].
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let mut builder = Self::builder()
            .secret_store(Arc::new(LocalSecretStore::new(&config.data_bag_path)));

        if let Some(vault_config) = &config.vault {
            let client = VaultKvClient::new(vault_config.clone())
                .map_err(|e| MaterialError::config(format!("Vault client setup failed: {}", e)))?;
            builder = builder.vault(Arc::new(client));
        }

        if let Some(secret_file) = &config.default_secret_file {
            builder = builder.default_secret_file(secret_file.clone());
        }

        Ok(builder.build())
    }

    pub fn resolver(&self) -> &ArtifactResolver {
        &self.resolver
    }

    /// Resolve both artifacts for `identity`.
    pub fn resolve_material(
        &self,
        key_spec: &ArtifactSpec,
        cert_spec: &ArtifactSpec,
        identity: &ServerName,
    ) -> Result<ResolvedMaterial> {
        let span = info_span!("resolve_material", server_name = %identity);
        let _enter = span.enter();

        let key = self.resolver.resolve(key_spec, ResolveContext::Key)?;
        self.finish_with_certificate(key, key_spec, cert_spec, identity)
    }

    /// Resolve both artifacts from cascaded resource settings.
    ///
    /// The certificate's settings are only turned into a spec once the key
    /// has resolved, so an unknown key source never touches the certificate.
    pub fn resolve_resource(&self, settings: &ResolvedSettings) -> Result<ResolvedMaterial> {
        let identity = ServerName::new(settings.server_name.clone())?;
        let span = info_span!("resolve_resource", server_name = %identity);
        let _enter = span.enter();

        let key_spec = settings.key.to_spec(ArtifactKind::Key)?;
        let key = self.resolver.resolve(&key_spec, ResolveContext::Key)?;

        let cert_spec = settings.cert.to_spec(ArtifactKind::Certificate)?;
        self.finish_with_certificate(key, &key_spec, &cert_spec, &identity)
    }

    fn finish_with_certificate(
        &self,
        key: Vec<u8>,
        key_spec: &ArtifactSpec,
        cert_spec: &ArtifactSpec,
        identity: &ServerName,
    ) -> Result<ResolvedMaterial> {
        let cert = self
            .resolver
            .resolve(cert_spec, ResolveContext::Certificate { key: &key, identity })?;

        info!(
            key_source = %key_spec.source_kind(),
            cert_source = %cert_spec.source_kind(),
            "Resolved TLS material"
        );

        Ok(ResolvedMaterial::new(SecretBytes::new(key), cert))
    }
}

/// Builder for [`MaterialEngine`].
///
/// Unset collaborators default to the local filesystem, an empty in-memory
/// secret store, no vault and no default secret file.
#[derive(Default)]
pub struct MaterialEngineBuilder {
    file_system: Option<Arc<dyn FileSystem>>,
    secret_store: Option<Arc<dyn SecretStoreClient>>,
    vault: Option<Arc<dyn VaultClient>>,
    default_secret_file: Option<PathBuf>,
}

impl MaterialEngineBuilder {
    pub fn file_system(mut self, file_system: Arc<dyn FileSystem>) -> Self {
        self.file_system = Some(file_system);
        self
    }

    pub fn secret_store(mut self, secret_store: Arc<dyn SecretStoreClient>) -> Self {
        self.secret_store = Some(secret_store);
        self
    }

    pub fn vault(mut self, vault: Arc<dyn VaultClient>) -> Self {
        self.vault = Some(vault);
        self
    }

    pub fn default_secret_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_secret_file = Some(path.into());
        self
    }

    pub fn build(self) -> MaterialEngine {
        let reader = SourceReader::new(
            self.file_system.unwrap_or_else(|| Arc::new(LocalFileSystem)),
            self.secret_store.unwrap_or_else(|| Arc::new(InMemoryItemStore::new())),
            self.vault,
            self.default_secret_file,
        );
        MaterialEngine { resolver: ArtifactResolver::new(reader) }
    }
}
