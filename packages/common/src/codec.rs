//! Printable encoding for binary payloads stored inside JSON documents.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};

pub use base64::DecodeError;

/// Encode bytes as standard (padded) base64.
pub fn encode(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Decode standard base64 produced by [`encode`].
pub fn decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    BASE64.decode(text)
}
