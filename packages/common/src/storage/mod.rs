mod document;
mod error;
mod traits;

pub mod memory;
pub mod unavailable;

pub use document::{Document, Fields, KeyFilter};
pub use error::StorageError;
pub use traits::{DocumentStore, UpsertOutcome};
