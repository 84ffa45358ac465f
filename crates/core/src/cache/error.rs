use thiserror::Error;

/// Errors that can occur in a key/value cache medium.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache medium unavailable: {0}")]
    Unavailable(String),
    #[error("Cache operation failed: {0}")]
    OperationFailed(String),
    #[error("Invalid cache key: {0}")]
    InvalidKey(String),
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
