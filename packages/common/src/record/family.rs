use serde_json::Value;

use crate::record::RecordError;
use crate::storage::{Fields, KeyFilter};

/// A record family: one logical collection plus its key and required fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Family {
    label: &'static str,
    collection: &'static str,
    key_fields: &'static [&'static str],
    required_fields: &'static [&'static str],
}

impl Family {
    pub const fn new(
        label: &'static str,
        collection: &'static str,
        key_fields: &'static [&'static str],
        required_fields: &'static [&'static str],
    ) -> Self {
        Self {
            label,
            collection,
            key_fields,
            required_fields,
        }
    }

    /// Diary image generation requests, keyed by `imageName`.
    pub const fn generation_requests() -> Self {
        Self::new(
            "Generation request",
            "generateRequests",
            &["imageName"],
            &["imageName", "text_payload"],
        )
    }

    /// Uploaded images, keyed by `filename`, payload base64-encoded in `base64`.
    pub const fn images() -> Self {
        Self::new("Image", "images", &["filename"], &["filename", "base64"])
    }

    /// User accounts, keyed by `username`.
    pub const fn users() -> Self {
        Self::new("User", "users", &["username"], &["username", "password"])
    }

    /// Human-readable name used in error messages.
    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn collection(&self) -> &'static str {
        self.collection
    }

    /// Check that `body` carries every key field and every required field.
    pub fn validate(&self, body: &Fields) -> Result<(), RecordError> {
        let mut missing: Vec<&str> = Vec::new();
        for field in self.key_fields.iter().chain(self.required_fields) {
            if !is_present(body, field) && !missing.contains(field) {
                missing.push(*field);
            }
        }
        missing_fields_error(&missing)
    }

    /// Build the natural-key filter for `body`.
    pub fn key_filter(&self, body: &Fields) -> Result<KeyFilter, RecordError> {
        let missing: Vec<&str> = self
            .key_fields
            .iter()
            .copied()
            .filter(|field| !is_present(body, field))
            .collect();
        missing_fields_error(&missing)?;

        let pairs = self
            .key_fields
            .iter()
            .filter_map(|field| body.get(*field).map(|v| (field.to_string(), v.clone())))
            .collect();
        Ok(KeyFilter::new(pairs))
    }

    /// Build the filter for a single-field key from its value.
    pub fn key_of(&self, value: impl Into<Value>) -> Result<KeyFilter, RecordError> {
        let [field] = self.key_fields else {
            return Err(RecordError::Validation(format!(
                "{} key has {} fields",
                self.label,
                self.key_fields.len()
            )));
        };
        let mut body = Fields::new();
        body.insert(field.to_string(), value.into());
        self.key_filter(&body)
    }
}

fn is_present(body: &Fields, field: &str) -> bool {
    body.get(field).is_some_and(|v| !v.is_null())
}

fn missing_fields_error(missing: &[&str]) -> Result<(), RecordError> {
    if missing.is_empty() {
        Ok(())
    } else {
        Err(RecordError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}
