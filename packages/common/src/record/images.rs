use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::codec;
use crate::record::{DeleteOutcome, Family, Reconciler, RecordError};
use crate::storage::{Document, DocumentStore, Fields, StorageError, UpsertOutcome};

/// An image record as stored: the filename and its base64 payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredImage {
    pub filename: String,
    pub base64: String,
}

impl StoredImage {
    /// Decode the stored payload back into the uploaded bytes.
    pub fn decode(&self) -> Result<Vec<u8>, RecordError> {
        codec::decode(&self.base64).map_err(|e| {
            StorageError::Corrupt {
                collection: Family::images().collection().to_string(),
                detail: format!("payload of '{}' is not valid base64: {e}", self.filename),
            }
            .into()
        })
    }

    fn from_document(doc: Document) -> Result<Self, RecordError> {
        let field = |name: &str| {
            doc.body
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_owned)
                .ok_or_else(|| StorageError::Corrupt {
                    collection: Family::images().collection().to_string(),
                    detail: format!("document {} has no string field '{name}'", doc.id),
                })
        };
        Ok(Self {
            filename: field("filename")?,
            base64: field("base64")?,
        })
    }
}

/// Image records: binary uploads stored as base64 text fields.
#[derive(Clone)]
pub struct Images {
    records: Reconciler,
}

impl Images {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            records: Reconciler::new(store, Family::images()),
        }
    }

    /// Store `data` under `filename`, replacing any previous upload with that name.
    pub async fn put(&self, filename: &str, data: &[u8]) -> Result<UpsertOutcome, RecordError> {
        let mut body = Fields::new();
        body.insert("filename".to_string(), Value::from(filename));
        body.insert("base64".to_string(), Value::from(codec::encode(data)));
        self.records.upsert(body).await
    }

    pub async fn list(&self) -> Result<Vec<Document>, RecordError> {
        self.records.find_all().await
    }

    pub async fn get(&self, filename: &str) -> Result<StoredImage, RecordError> {
        let filter = self.records.family().key_of(filename)?;
        let doc = self.records.get(&filter).await?;
        StoredImage::from_document(doc)
    }

    pub async fn delete(&self, filename: &str) -> Result<DeleteOutcome, RecordError> {
        let filter = self.records.family().key_of(filename)?;
        self.records.delete(&filter).await
    }
}
