use std::fmt;

use serde_json::{Map, Value};

/// A JSON object body as stored in a collection.
pub type Fields = Map<String, Value>;

/// A stored document: its store-assigned identifier and the body it was last written with.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Opaque identifier assigned on first insert. Survives replacement.
    pub id: String,
    pub body: Fields,
}

impl Document {
    /// Render the document as a JSON object with its identifier under `_id`.
    pub fn into_json(self) -> Value {
        let mut body = self.body;
        body.insert("_id".to_string(), Value::String(self.id));
        Value::Object(body)
    }
}

/// Equality filter over the natural-key fields of a record family.
///
/// Built by [`crate::record::Family::key_filter`], so a filter always names
/// exactly the family's key fields, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyFilter {
    pairs: Vec<(String, Value)>,
}

impl KeyFilter {
    pub(crate) fn new(pairs: Vec<(String, Value)>) -> Self {
        Self { pairs }
    }

    pub fn pairs(&self) -> &[(String, Value)] {
        &self.pairs
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.pairs
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Canonical string form of the key values, stored alongside each document.
    ///
    /// Two filters of the same family produce the same string exactly when
    /// their values are equal.
    pub fn natural_key(&self) -> String {
        Value::Array(self.pairs.iter().map(|(_, v)| v.clone()).collect()).to_string()
    }
}

impl fmt::Display for KeyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        Ok(())
    }
}
