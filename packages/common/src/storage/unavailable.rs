use async_trait::async_trait;

use super::document::{Document, Fields, KeyFilter};
use super::error::StorageError;
use super::traits::{DocumentStore, UpsertOutcome};

/// Stand-in store installed when the real one could not be reached at startup.
///
/// Every operation fails with [`StorageError::Unavailable`] so the process can
/// keep serving and report the degraded state per request.
#[derive(Debug, Clone)]
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> StorageError {
        StorageError::Unavailable(self.reason.clone())
    }
}

#[async_trait]
impl DocumentStore for UnavailableStore {
    async fn replace_one(
        &self,
        _collection: &str,
        _filter: &KeyFilter,
        _body: &Fields,
    ) -> Result<UpsertOutcome, StorageError> {
        Err(self.error())
    }

    async fn insert_one(
        &self,
        _collection: &str,
        _filter: &KeyFilter,
        _body: &Fields,
    ) -> Result<Document, StorageError> {
        Err(self.error())
    }

    async fn find(&self, _collection: &str) -> Result<Vec<Document>, StorageError> {
        Err(self.error())
    }

    async fn find_one(
        &self,
        _collection: &str,
        _filter: &KeyFilter,
    ) -> Result<Option<Document>, StorageError> {
        Err(self.error())
    }

    async fn delete_one(
        &self,
        _collection: &str,
        _filter: &KeyFilter,
    ) -> Result<bool, StorageError> {
        Err(self.error())
    }
}
