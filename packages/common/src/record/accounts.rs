use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::password;
use crate::record::{Family, Reconciler, RecordError};
use crate::storage::{DocumentStore, Fields};

/// User accounts with salted, hashed credentials.
#[derive(Clone)]
pub struct Accounts {
    records: Reconciler,
}

impl Accounts {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            records: Reconciler::new(store, Family::users()),
        }
    }

    /// Create an account. Fails with [`RecordError::Conflict`] if the username is taken.
    pub async fn signup(&self, username: &str, password: &str) -> Result<(), RecordError> {
        require_credentials(username, password)?;

        let filter = self.records.family().key_of(username)?;
        if self.records.find_one(&filter).await?.is_some() {
            return Err(RecordError::Conflict("Username is already taken".into()));
        }

        let hash =
            password::hash_password(password).map_err(|e| RecordError::Hash(e.to_string()))?;

        let mut body = Fields::new();
        body.insert("username".to_string(), Value::from(username));
        body.insert("password".to_string(), Value::from(hash));

        // A concurrent signup for the same name surfaces as Conflict here.
        self.records.create(body).await?;
        Ok(())
    }

    /// Check credentials. Never writes; does not say which field was wrong.
    pub async fn login(&self, username: &str, password: &str) -> Result<bool, RecordError> {
        require_credentials(username, password)?;

        let filter = self.records.family().key_of(username)?;
        let Some(doc) = self.records.find_one(&filter).await? else {
            return Ok(false);
        };

        let Some(stored) = doc.body.get("password").and_then(Value::as_str) else {
            warn!(username, "Account has no stored password");
            return Ok(false);
        };

        match password::verify_password(password, stored) {
            Ok(valid) => Ok(valid),
            Err(e) => {
                warn!(username, "Stored password is not a valid hash: {e}");
                Ok(false)
            }
        }
    }
}

fn require_credentials(username: &str, password: &str) -> Result<(), RecordError> {
    let mut missing = Vec::new();
    if username.is_empty() {
        missing.push("username");
    }
    if password.is_empty() {
        missing.push("password");
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(RecordError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}
