//! # Configuration Management
//!
//! Two layers feed the engine:
//!
//! - [`EngineConfig`]: process-wide settings from the environment (default
//!   secret file, local secret store root, Vault connection)
//! - [`ResourceSettings`]: per-resource settings cascaded from explicit
//!   overrides, a node attribute tree and platform defaults
//!
//! ```rust
//! use serde_json::json;
//! use tls_material::config::{Platform, ResourceSettings};
//!
//! let node = json!({
//!     "fqdn": "web01.example.test",
//!     "web": { "source": "self-signed" }
//! });
//!
//! let settings = ResourceSettings::new("web").resolve(&node, Platform::Debian, None)?;
//! assert_eq!(settings.key.path.to_str(), Some("/etc/ssl/private/web.key"));
//! assert_eq!(settings.cert.path.to_str(), Some("/etc/ssl/certs/web.pem"));
//! # Ok::<(), tls_material::MaterialError>(())
//! ```

pub mod attributes;
pub mod resource;
pub mod settings;

pub use attributes::{load_attributes, lookup_path, parse_yaml_attributes, Platform};
pub use resource::{ArtifactOverrides, ArtifactSettings, ResolvedSettings, ResourceSettings};
pub use settings::EngineConfig;
