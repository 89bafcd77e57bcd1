//! Error types for the KeeVault core library.

use thiserror::Error;

/// Errors that can occur at the JSON boundary of the library.
///
/// Malformed URLs, unresolvable domains and unparseable `KPRPC JSON`
/// payloads are absorbed inside the ranking pass and never surface here;
/// only the JSON convenience wrappers return errors.
#[derive(Error, Debug, Clone)]
pub enum VaultError {
    /// Error serializing/deserializing JSON
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        VaultError::Json(err.to_string())
    }
}

/// Result type alias for vault operations.
pub type VaultResult<T> = Result<T, VaultError>;
