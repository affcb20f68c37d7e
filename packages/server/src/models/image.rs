use common::record::StoredImage;
use serde::Serialize;

/// An image with its payload as base64 text.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ImageResponse {
    #[schema(example = "2024-05-01.png")]
    pub filename: String,
    /// Standard base64 of the uploaded bytes.
    #[schema(example = "iVBORw0KGgo=")]
    pub base64: String,
}

impl From<StoredImage> for ImageResponse {
    fn from(image: StoredImage) -> Self {
        Self {
            filename: image.filename,
            base64: image.base64,
        }
    }
}
