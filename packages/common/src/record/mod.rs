mod accounts;
mod error;
mod family;
mod images;
mod reconciler;

pub use accounts::Accounts;
pub use error::RecordError;
pub use family::Family;
pub use images::{Images, StoredImage};
pub use reconciler::{DeleteOutcome, Reconciler};
