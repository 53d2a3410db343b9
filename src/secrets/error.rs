//! Error types for secret backend operations.

use thiserror::Error;

/// Result type for secret backend operations.
pub type Result<T> = std::result::Result<T, SecretsError>;

/// Errors that can occur while loading an item from a secret backend.
///
/// The material source reader deliberately collapses all of these into a
/// single "not found" outcome; they exist so backends can log and test
/// precise failure causes.
#[derive(Error, Debug)]
pub enum SecretsError {
    /// Item not found in the backend.
    #[error("Secret not found: {key}")]
    NotFound { key: String },

    /// Failed to connect to the secrets backend.
    #[error("Backend connection failed: {message}")]
    ConnectionFailed { message: String },

    /// An encrypted item could not be decrypted.
    #[error("Decryption failed for '{key}': {reason}")]
    Decryption { key: String, reason: String },

    /// The item document or one of its coordinates is malformed.
    #[error("Invalid item '{key}': {reason}")]
    InvalidItem { key: String, reason: String },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SecretsError {
    /// Create a not found error.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create a connection failed error.
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::ConnectionFailed { message: message.into() }
    }

    /// Create a decryption error.
    pub fn decryption(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decryption { key: key.into(), reason: reason.into() }
    }

    /// Create an invalid item error.
    pub fn invalid_item(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidItem { key: key.into(), reason: reason.into() }
    }

    /// Create a config error.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError { message: message.into() }
    }
}
