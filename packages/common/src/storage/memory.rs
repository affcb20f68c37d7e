use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::document::{Document, Fields, KeyFilter};
use super::error::StorageError;
use super::traits::{DocumentStore, UpsertOutcome};

#[derive(Debug, Clone)]
struct StoredDocument {
    id: Uuid,
    key: String,
    body: Fields,
}

impl StoredDocument {
    fn to_document(&self) -> Document {
        Document {
            id: self.id.to_string(),
            body: self.body.clone(),
        }
    }
}

/// In-process document store.
///
/// Collections are kept as insertion-ordered vectors behind a single lock.
/// Used for local development (`memory://`) and tests.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<StoredDocument>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn replace_one(
        &self,
        collection: &str,
        filter: &KeyFilter,
        body: &Fields,
    ) -> Result<UpsertOutcome, StorageError> {
        let key = filter.natural_key();
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        if let Some(existing) = docs.iter_mut().find(|d| d.key == key) {
            existing.body = body.clone();
            return Ok(UpsertOutcome::Replaced);
        }

        docs.push(StoredDocument {
            id: Uuid::now_v7(),
            key,
            body: body.clone(),
        });
        Ok(UpsertOutcome::Created)
    }

    async fn insert_one(
        &self,
        collection: &str,
        filter: &KeyFilter,
        body: &Fields,
    ) -> Result<Document, StorageError> {
        let key = filter.natural_key();
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        if docs.iter().any(|d| d.key == key) {
            return Err(StorageError::DuplicateKey {
                collection: collection.to_string(),
                key,
            });
        }

        let stored = StoredDocument {
            id: Uuid::now_v7(),
            key,
            body: body.clone(),
        };
        let document = stored.to_document();
        docs.push(stored);
        Ok(document)
    }

    async fn find(&self, collection: &str) -> Result<Vec<Document>, StorageError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().map(StoredDocument::to_document).collect())
            .unwrap_or_default())
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &KeyFilter,
    ) -> Result<Option<Document>, StorageError> {
        let key = filter.natural_key();
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.key == key))
            .map(StoredDocument::to_document))
    }

    async fn delete_one(
        &self,
        collection: &str,
        filter: &KeyFilter,
    ) -> Result<bool, StorageError> {
        let key = filter.natural_key();
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(false);
        };

        match docs.iter().position(|d| d.key == key) {
            Some(index) => {
                docs.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
