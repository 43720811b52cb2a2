//! Error types for the cache
//!
//! Provides unified error handling using thiserror.
//!
//! A missing key is not an error: lookups return `Option` and deletes
//! return `bool`. Only invalid input and invalid configuration fail.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key is empty or exceeds the maximum key length
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Construction parameter rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
