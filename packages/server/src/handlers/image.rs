use axum::{
    Json,
    body::Body,
    extract::{DefaultBodyLimit, Multipart, Path, State, multipart::MultipartError},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use common::{DeleteOutcome, UpsertOutcome};
use serde_json::Value;
use tracing::instrument;

use crate::config::ImageServeMode;
use crate::error::{AppError, ErrorBody};
use crate::models::image::ImageResponse;
use crate::models::shared::{MessageResponse, upsert_status};
use crate::state::AppState;
use crate::utils::filename::{content_disposition_value, validate_image_filename};

/// Body limit for image uploads, with headroom for multipart framing.
pub fn image_upload_body_limit(max_bytes: usize) -> DefaultBodyLimit {
    DefaultBodyLimit::max(max_bytes.saturating_add(4096))
}

fn too_large(max_bytes: usize) -> AppError {
    AppError::PayloadTooLarge(format!("File too large: the limit is {} bytes", max_bytes))
}

fn multipart_error(context: &str, err: MultipartError, max_bytes: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large(max_bytes)
    } else {
        AppError::Validation(format!("{}: {}", context, err))
    }
}

#[utoipa::path(
    post,
    path = "/image",
    tag = "Images",
    operation_id = "uploadImage",
    summary = "Upload an image",
    description = "Stores the uploaded bytes as base64 under the given filename. Uploading an \
        existing filename replaces the stored image.",
    request_body(content_type = "multipart/form-data", description = "`file` part with the image bytes, optional `filename` text field"),
    responses(
        (status = 201, description = "Image stored", body = MessageResponse),
        (status = 200, description = "Existing image replaced", body = MessageResponse),
        (status = 400, description = "Missing file or invalid filename (VALIDATION_ERROR)", body = ErrorBody),
        (status = 413, description = "File exceeds image.max_upload_bytes (PAYLOAD_TOO_LARGE)", body = ErrorBody),
        (status = 500, description = "Document store failure (STORAGE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let max_bytes = state.config.image.max_upload_bytes;
    let mut data: Option<Vec<u8>> = None;
    let mut part_filename: Option<String> = None;
    let mut field_filename: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Invalid multipart body", e, max_bytes))?
    {
        match field.name() {
            Some("file") => {
                part_filename = field.file_name().map(str::to_owned);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error("Failed to read file", e, max_bytes))?;
                if bytes.len() > max_bytes {
                    return Err(too_large(max_bytes));
                }
                data = Some(bytes.to_vec());
            }
            Some("filename") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| multipart_error("Failed to read filename", e, max_bytes))?;
                field_filename = Some(text);
            }
            _ => {}
        }
    }

    let data = data.ok_or_else(|| AppError::Validation("No file part in the request".into()))?;
    let requested = field_filename
        .filter(|name| !name.trim().is_empty())
        .or(part_filename)
        .ok_or_else(|| AppError::Validation("No filename provided".into()))?;
    let filename =
        validate_image_filename(&requested).map_err(|e| AppError::Validation(e.message().into()))?;

    let outcome = state.images.put(filename, &data).await?;
    tracing::info!(filename, bytes = data.len(), ?outcome, "Image stored");

    let message = match outcome {
        UpsertOutcome::Created => "Image uploaded successfully.",
        UpsertOutcome::Replaced => "Image replaced successfully.",
    };
    Ok((upsert_status(outcome), Json(MessageResponse::new(message))))
}

#[utoipa::path(
    get,
    path = "/image",
    tag = "Images",
    operation_id = "listImages",
    summary = "List all stored images",
    description = "Returns every stored image record, payloads included, in insertion order.",
    responses(
        (status = 200, description = "All images", body = [Object]),
        (status = 500, description = "Document store failure (STORAGE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_images(State(state): State<AppState>) -> Result<Json<Vec<Value>>, AppError> {
    let docs = state.images.list().await?;
    Ok(Json(docs.into_iter().map(|d| d.into_json()).collect()))
}

#[utoipa::path(
    get,
    path = "/image/{filename}",
    tag = "Images",
    operation_id = "getImage",
    summary = "Fetch one image",
    description = "Depending on `image.serve_mode`, returns the decoded bytes with a content type \
        guessed from the filename, or a JSON object holding the base64 payload.",
    params(("filename" = String, Path, description = "Stored image filename")),
    responses(
        (status = 200, description = "Image bytes (binary_stream mode)", content_type = "application/octet-stream"),
        (status = 200, description = "Image record (encoded_json mode)", body = ImageResponse),
        (status = 404, description = "Image not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Document store failure (STORAGE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let image = state.images.get(&filename).await?;

    match state.config.image.serve_mode {
        ImageServeMode::EncodedJson => Ok(Json(ImageResponse::from(image)).into_response()),
        ImageServeMode::BinaryStream => {
            let bytes = image.decode()?;
            let content_type = mime_guess::from_path(&image.filename)
                .first_or_octet_stream()
                .to_string();

            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, content_type)
                .header(header::CONTENT_LENGTH, bytes.len())
                .header(
                    header::CONTENT_DISPOSITION,
                    content_disposition_value(&image.filename),
                )
                .body(Body::from(bytes))
                .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))
        }
    }
}

#[utoipa::path(
    delete,
    path = "/image/{filename}",
    tag = "Images",
    operation_id = "deleteImage",
    summary = "Delete one image",
    params(("filename" = String, Path, description = "Stored image filename")),
    responses(
        (status = 200, description = "Image deleted", body = MessageResponse),
        (status = 404, description = "Image not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Document store failure (STORAGE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    match state.images.delete(&filename).await? {
        DeleteOutcome::Deleted => Ok(Json(MessageResponse::new("Image deleted successfully."))),
        DeleteOutcome::NotFound => Err(AppError::NotFound("Image not found".into())),
    }
}
