use thiserror::Error;

use crate::storage::StorageError;

/// Errors produced by record-level operations.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The caller supplied a body missing required fields.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// The natural key is already taken.
    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("password hashing failed: {0}")]
    Hash(String),
}
