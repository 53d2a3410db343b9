//! Secret backend client traits.
//!
//! The material engine reads key and certificate content out of named items
//! held by two kinds of external stores:
//!
//! - a **secret store**, whose items may be encrypted at rest and decrypted
//!   with a local secret file ([`SecretStoreClient`]),
//! - a **vault**, an access-controlled store with its own retrieval protocol
//!   ([`VaultClient`]).
//!
//! Both return an item as a map of field name to JSON value. Calls are
//! synchronous; the engine resolves material in a single blocking pass.

use std::collections::HashMap;
use std::path::Path;

use super::error::Result;

/// Fields of a loaded item, keyed by field name.
pub type ItemFields = HashMap<String, serde_json::Value>;

/// Client for an item store with optional at-rest encryption.
///
/// # Security Considerations
///
/// - Implementations MUST NOT log field values
/// - The secret file contents MUST NOT appear in error messages
pub trait SecretStoreClient: Send + Sync {
    /// Load item `item_id` from container `container_id`.
    ///
    /// When `secret_file` is `Some`, the item is encrypted and every field
    /// except `id` is decrypted with the secret read from that file.
    ///
    /// # Errors
    ///
    /// - [`SecretsError::NotFound`](super::SecretsError::NotFound) if the item doesn't exist
    /// - [`SecretsError::Decryption`](super::SecretsError::Decryption) if decryption fails
    fn load_item(
        &self,
        container_id: &str,
        item_id: &str,
        secret_file: Option<&Path>,
    ) -> Result<ItemFields>;
}

/// Client for a vault item store.
pub trait VaultClient: Send + Sync {
    /// Load item `item_id` from vault container `container_id`.
    fn load_item(&self, container_id: &str, item_id: &str) -> Result<ItemFields>;
}

/// Display form of item coordinates used in logs and errors: `container.item->field`.
pub fn item_location(container_id: &str, item_id: &str, field: &str) -> String {
    format!("{}.{}->{}", container_id, item_id, field)
}
