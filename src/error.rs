//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache engine and its store adapters.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key absent, or present but expired. The two cases are never
    /// distinguished to the caller; both are an ordinary cache miss.
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Value could not be encoded for storage
    #[error("Failed to encode value for key '{key}': {reason}")]
    Serialization { key: String, reason: String },

    /// Stored payload could not be decoded into the requested shape
    #[error("Failed to decode value for key '{key}': {reason}")]
    Deserialization { key: String, reason: String },

    /// The durable store failed the request (I/O failure, store unavailable)
    #[error("Store operation failed: {0}")]
    Store(String),
}

impl CacheError {
    /// Returns true for the ordinary cache-miss outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound(_))
    }
}

// == Conversions ==
impl From<std::io::Error> for CacheError {
    fn from(err: std::io::Error) -> Self {
        CacheError::Store(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;
