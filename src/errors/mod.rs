//! # Error Handling
//!
//! Error types for TLS material resolution, defined with `thiserror`.
//!
//! Every variant carries enough context (artifact, source kind, backend
//! coordinates) for a caller to diagnose a failed resolution without access
//! to the engine's logs.

use std::path::PathBuf;

use crate::material::{ArtifactKind, SourceKind};

/// Custom result type for material resolution
pub type Result<T> = std::result::Result<T, MaterialError>;

/// Main error type for material resolution
#[derive(thiserror::Error, Debug)]
pub enum MaterialError {
    /// A non-self-signed source produced no content
    #[error("Cannot read SSL {artifact} from {source_kind}: {location}")]
    MissingSource { artifact: ArtifactKind, source_kind: SourceKind, location: String },

    /// The configured source kind is not one of the supported kinds
    #[error("Cannot read SSL {artifact}, unknown source: {value}")]
    UnknownSource { artifact: ArtifactKind, value: String },

    /// The private key could not be parsed
    #[error("Invalid private key: {reason}")]
    KeyParse { reason: String },

    /// The certificate could not be parsed
    #[error("Invalid certificate: {reason}")]
    CertParse { reason: String },

    /// A cryptographic primitive failed
    #[error("Generation failed: {reason}")]
    Generation { reason: String },

    /// A local file exists but could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid or incomplete configuration
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl MaterialError {
    /// Create a missing source error
    pub fn missing_source<S: Into<String>>(
        artifact: ArtifactKind,
        source_kind: SourceKind,
        location: S,
    ) -> Self {
        Self::MissingSource { artifact, source_kind, location: location.into() }
    }

    /// Create an unknown source error
    pub fn unknown_source<S: Into<String>>(artifact: ArtifactKind, value: S) -> Self {
        Self::UnknownSource { artifact, value: value.into() }
    }

    /// Create a key parse error
    pub fn key_parse<S: Into<String>>(reason: S) -> Self {
        Self::KeyParse { reason: reason.into() }
    }

    /// Create a certificate parse error
    pub fn cert_parse<S: Into<String>>(reason: S) -> Self {
        Self::CertParse { reason: reason.into() }
    }

    /// Create a generation error
    pub fn generation<S: Into<String>>(reason: S) -> Self {
        Self::Generation { reason: reason.into() }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    /// Create an I/O error for the given path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
