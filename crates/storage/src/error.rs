//! File store error types.

use thiserror::Error;

/// File store operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("invalid filename: {0}")]
    InvalidName(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for file store operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;
