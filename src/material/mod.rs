//! # Material Resolution
//!
//! Resolves a TLS private key and certificate for one server identity.
//!
//! ```text
//! ArtifactSpec ─→ ArtifactResolver ─→ SourceReader ─→ file / secret store / vault
//!                        │
//!                        ├─→ keygen   (self-signed key absent)
//!                        ├─→ verify   (self-signed cert present)
//!                        └─→ certgen  (self-signed cert absent or stale)
//! ```
//!
//! [`MaterialEngine`] resolves the key first, then the certificate with the
//! key in hand. Generated material is returned, never written to disk.

pub mod certgen;
pub mod engine;
pub mod keygen;
pub mod resolver;
pub mod source;
pub mod spec;
pub mod verify;

pub use certgen::{generate_self_signed, VALIDITY_DAYS};
pub use engine::{MaterialEngine, MaterialEngineBuilder};
pub use keygen::{generate_key, parse_private_key, KEY_BITS};
pub use resolver::{ArtifactResolver, ResolveContext};
pub use source::{FileSystem, LocalFileSystem, SourceReader};
pub use spec::{
    ArtifactKind, ArtifactSpec, ItemLocator, ResolvedMaterial, ServerName, SourceKind,
};
pub use verify::verify;
