//! Secret backends for TLS material.
//!
//! Key and certificate content can live in two kinds of external item stores:
//!
//! - **Secret store**: named items grouped in containers, optionally
//!   encrypted at rest and decrypted with a local secret file
//!   ([`SecretStoreClient`], implemented by [`LocalSecretStore`])
//! - **Vault**: HashiCorp Vault KV v2 ([`VaultClient`], implemented by
//!   [`VaultKvClient`])
//!
//! [`InMemoryItemStore`] implements both traits for embedding and tests.
//!
//! # Example
//!
//! ```rust,no_run
//! use tls_material::secrets::{LocalSecretStore, SecretStoreClient};
//! use std::path::Path;
//!
//! let store = LocalSecretStore::new("/var/lib/tls-material/data_bags");
//! let item = store.load_item("ssl", "web", Some(Path::new("/etc/tls-material/secret")))?;
//! let key_pem = item.get("key").and_then(|v| v.as_str());
//! # Ok::<(), tls_material::secrets::SecretsError>(())
//! ```
//!
//! # Security Considerations
//!
//! - Item field values and secrets are never logged or put in error messages
//! - Key material is carried in [`SecretBytes`], zeroed on drop

pub mod client;
pub mod encrypted;
pub mod error;
pub mod local;
pub mod memory;
pub mod types;
pub mod vault;

pub use client::{item_location, ItemFields, SecretStoreClient, VaultClient};
pub use encrypted::{decrypt_item_fields, encrypt_item_fields, load_secret};
pub use error::{Result, SecretsError};
pub use local::LocalSecretStore;
pub use memory::InMemoryItemStore;
pub use types::SecretBytes;
pub use vault::{VaultBackendConfig, VaultKvClient};
