use std::sync::Arc;

use tracing::{debug, instrument};

use crate::record::{Family, RecordError};
use crate::storage::{Document, DocumentStore, Fields, KeyFilter, StorageError, UpsertOutcome};

/// Outcome of a delete-by-key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// Nothing matched. A normal outcome, not a failure.
    NotFound,
}

/// Upsert/read/delete of one record family against a document store.
///
/// Holds no mutable state of its own; cloning is cheap.
#[derive(Clone)]
pub struct Reconciler {
    store: Arc<dyn DocumentStore>,
    family: Family,
}

impl Reconciler {
    pub fn new(store: Arc<dyn DocumentStore>, family: Family) -> Self {
        Self { store, family }
    }

    pub fn family(&self) -> &Family {
        &self.family
    }

    /// Insert `body`, or fully replace the record sharing its natural key.
    ///
    /// Validation happens before the store is touched.
    #[instrument(skip_all, fields(collection = self.family.collection()))]
    pub async fn upsert(&self, body: Fields) -> Result<UpsertOutcome, RecordError> {
        self.family.validate(&body)?;
        let filter = self.family.key_filter(&body)?;

        let outcome = self
            .store
            .replace_one(self.family.collection(), &filter, &body)
            .await?;

        debug!(%filter, ?outcome, "Upserted record");
        Ok(outcome)
    }

    /// Insert `body` only if its natural key is free.
    #[instrument(skip_all, fields(collection = self.family.collection()))]
    pub async fn create(&self, body: Fields) -> Result<Document, RecordError> {
        self.family.validate(&body)?;
        let filter = self.family.key_filter(&body)?;

        match self
            .store
            .insert_one(self.family.collection(), &filter, &body)
            .await
        {
            Ok(doc) => Ok(doc),
            Err(StorageError::DuplicateKey { .. }) => Err(RecordError::Conflict(format!(
                "{} with {filter} already exists",
                self.family.label()
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Every record of the family, in insertion order.
    pub async fn find_all(&self) -> Result<Vec<Document>, RecordError> {
        Ok(self.store.find(self.family.collection()).await?)
    }

    pub async fn find_one(&self, filter: &KeyFilter) -> Result<Option<Document>, RecordError> {
        Ok(self
            .store
            .find_one(self.family.collection(), filter)
            .await?)
    }

    /// Like [`Self::find_one`], but absence is a [`RecordError::NotFound`].
    pub async fn get(&self, filter: &KeyFilter) -> Result<Document, RecordError> {
        self.find_one(filter)
            .await?
            .ok_or_else(|| RecordError::NotFound(format!("{} not found", self.family.label())))
    }

    #[instrument(skip_all, fields(collection = self.family.collection(), %filter))]
    pub async fn delete(&self, filter: &KeyFilter) -> Result<DeleteOutcome, RecordError> {
        let removed = self
            .store
            .delete_one(self.family.collection(), filter)
            .await?;

        if removed {
            debug!("Deleted record");
            Ok(DeleteOutcome::Deleted)
        } else {
            Ok(DeleteOutcome::NotFound)
        }
    }
}
