pub mod codec;
pub mod password;
pub mod record;
pub mod storage;

pub use record::{Accounts, DeleteOutcome, Family, Images, Reconciler, RecordError};
pub use storage::{Document, DocumentStore, Fields, KeyFilter, StorageError, UpsertOutcome};
