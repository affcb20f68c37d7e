use thiserror::Error;

/// Errors raised by a document store backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store could not be reached (or was never configured).
    #[error("document store unavailable: {0}")]
    Unavailable(String),

    /// An insert collided with an existing natural key.
    #[error("duplicate key {key} in collection '{collection}'")]
    DuplicateKey { collection: String, key: String },

    /// The store rejected or failed the operation.
    #[error("document store query failed: {0}")]
    Query(String),

    /// A stored document does not have the shape its family expects.
    #[error("corrupt document in collection '{collection}': {detail}")]
    Corrupt { collection: String, detail: String },
}
