//! # tls-material
//!
//! Resolves, verifies and, when needed, generates the TLS private key and
//! certificate for a named server identity.
//!
//! Each artifact has its own source:
//!
//! - `file`: a local file that must exist
//! - `secret_store`: a field of a (possibly encrypted) secret store item
//! - `vault`: a field of a Vault KV item
//! - `self_signed`: a local file if present, otherwise freshly generated;
//!   an existing certificate is reused only if it matches the key and name
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use tls_material::{ArtifactSpec, MaterialEngine, ServerName};
//!
//! let engine = MaterialEngine::builder().build();
//! let material = engine.resolve_material(
//!     &ArtifactSpec::self_signed("/etc/ssl/private/web.key"),
//!     &ArtifactSpec::self_signed("/etc/ssl/certs/web.pem"),
//!     &ServerName::new("example.test")?,
//! )?;
//! std::fs::write("/etc/ssl/certs/web.pem", material.cert_bytes())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod errors;
pub mod material;
pub mod observability;
pub mod secrets;

// Re-export commonly used types
pub use config::{EngineConfig, ResolvedSettings, ResourceSettings};
pub use errors::{MaterialError, Result};
pub use material::{
    ArtifactKind, ArtifactSpec, ItemLocator, MaterialEngine, ResolvedMaterial, ServerName,
    SourceKind,
};
pub use observability::{init_logging, LoggingConfig};

/// Library version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
