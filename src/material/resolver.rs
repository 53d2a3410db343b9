//! Per-artifact resolution.
//!
//! One dispatch on the spec's source kind, no retries across branches:
//!
//! | source        | found                         | not found          |
//! |---------------|-------------------------------|--------------------|
//! | `file`        | bytes as-is                   | `MissingSource`    |
//! | `secret_store`| field value as-is             | `MissingSource`    |
//! | `vault`       | field value as-is             | `MissingSource`    |
//! | `self_signed` key | bytes as-is, never checked | new key            |
//! | `self_signed` cert | bytes if they verify      | new certificate    |
//!
//! Generated content is returned, never written; persisting it is the
//! caller's job.

use tracing::{debug, info, warn};

use super::certgen::generate_self_signed;
use super::keygen::generate_key;
use super::source::SourceReader;
use super::spec::{ArtifactKind, ArtifactSpec, ServerName};
use super::verify::verify;
use crate::errors::{MaterialError, Result};

/// What the artifact being resolved may depend on.
#[derive(Debug, Clone, Copy)]
pub enum ResolveContext<'a> {
    /// Resolving the private key.
    Key,
    /// Resolving the certificate for an already resolved key.
    Certificate { key: &'a [u8], identity: &'a ServerName },
}

impl ResolveContext<'_> {
    pub fn artifact(&self) -> ArtifactKind {
        match self {
            Self::Key => ArtifactKind::Key,
            Self::Certificate { .. } => ArtifactKind::Certificate,
        }
    }
}

/// Resolves a single artifact from its spec
#[derive(Debug, Clone)]
pub struct ArtifactResolver {
    reader: SourceReader,
}

impl ArtifactResolver {
    pub fn new(reader: SourceReader) -> Self {
        Self { reader }
    }

    pub fn reader(&self) -> &SourceReader {
        &self.reader
    }

    /// Resolve the bytes for one artifact.
    pub fn resolve(&self, spec: &ArtifactSpec, context: ResolveContext<'_>) -> Result<Vec<u8>> {
        let artifact = context.artifact();
        debug!(
            artifact = %artifact,
            source_kind = %spec.source_kind(),
            location = %spec.location(),
            "Resolving TLS artifact"
        );

        match spec {
            ArtifactSpec::File { .. }
            | ArtifactSpec::SecretStore { .. }
            | ArtifactSpec::Vault { .. } => self.read_required(spec, artifact),
            ArtifactSpec::SelfSigned { path } => {
                let existing = self.reader.read(spec)?;
                match context {
                    ResolveContext::Key => Self::self_signed_key(existing, &spec.location()),
                    ResolveContext::Certificate { key, identity } => {
                        Self::self_signed_cert(existing, key, identity, &path.display().to_string())
                    }
                }
            }
        }
    }

    fn read_required(&self, spec: &ArtifactSpec, artifact: ArtifactKind) -> Result<Vec<u8>> {
        self.reader.read(spec)?.ok_or_else(|| {
            MaterialError::missing_source(artifact, spec.source_kind(), spec.location())
        })
    }

    fn self_signed_key(existing: Option<Vec<u8>>, location: &str) -> Result<Vec<u8>> {
        match existing {
            Some(bytes) => {
                debug!(location = %location, "Reusing existing private key");
                Ok(bytes)
            }
            None => {
                info!(location = %location, "Generating new private key");
                Ok(generate_key()?.into_inner())
            }
        }
    }

    fn self_signed_cert(
        existing: Option<Vec<u8>>,
        key: &[u8],
        identity: &ServerName,
        location: &str,
    ) -> Result<Vec<u8>> {
        if let Some(bytes) = existing {
            match verify(key, &bytes, identity) {
                Ok(true) => {
                    debug!(
                        location = %location,
                        server_name = %identity,
                        "Reusing existing certificate"
                    );
                    return Ok(bytes);
                }
                Ok(false) => {
                    info!(
                        location = %location,
                        server_name = %identity,
                        "Existing certificate does not match key and server name, regenerating"
                    );
                }
                // An unreadable certificate is stale content, but a bad key cannot sign anything.
                Err(MaterialError::CertParse { reason }) => {
                    warn!(
                        location = %location,
                        reason = %reason,
                        "Existing certificate is unreadable, regenerating"
                    );
                }
                Err(e) => return Err(e),
            }
        } else {
            info!(
                location = %location,
                server_name = %identity,
                "Generating new self-signed certificate"
            );
        }

        generate_self_signed(key, identity)
    }
}
