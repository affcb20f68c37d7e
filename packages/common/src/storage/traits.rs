use async_trait::async_trait;

use super::document::{Document, Fields, KeyFilter};
use super::error::StorageError;

/// Outcome of an upsert-by-key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No document matched; the body was inserted.
    Created,
    /// A document matched and was fully replaced by the body.
    Replaced,
}

/// A collection-oriented document store.
///
/// Every method is a single atomic operation on one document. Implementations
/// must keep at most one document per `(collection, filter.natural_key())`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Replace the document matching `filter` with `body`, inserting it when none matches.
    async fn replace_one(
        &self,
        collection: &str,
        filter: &KeyFilter,
        body: &Fields,
    ) -> Result<UpsertOutcome, StorageError>;

    /// Insert `body` as a new document.
    ///
    /// Fails with [`StorageError::DuplicateKey`] when `filter` already matches.
    async fn insert_one(
        &self,
        collection: &str,
        filter: &KeyFilter,
        body: &Fields,
    ) -> Result<Document, StorageError>;

    /// All documents of a collection in insertion order.
    async fn find(&self, collection: &str) -> Result<Vec<Document>, StorageError>;

    async fn find_one(
        &self,
        collection: &str,
        filter: &KeyFilter,
    ) -> Result<Option<Document>, StorageError>;

    /// Delete the document matching `filter`.
    ///
    /// Returns `true` if a document was removed, `false` if none matched.
    async fn delete_one(&self, collection: &str, filter: &KeyFilter)
    -> Result<bool, StorageError>;

    /// Release the underlying connection. Called once at shutdown.
    async fn close(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
