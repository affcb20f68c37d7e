use axum::{Json, extract::State, response::IntoResponse};
use common::{DeleteOutcome, Fields, UpsertOutcome};
use serde_json::Value;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::shared::{MessageResponse, upsert_status};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/generate",
    tag = "Generation Requests",
    operation_id = "queueGenerationRequest",
    summary = "Queue a diary image generation request",
    description = "Stores the request keyed by `imageName`. Requires `imageName` and `text_payload`; \
        any other fields are stored verbatim. A request with an existing `imageName` fully \
        replaces the stored one.",
    request_body(content = Object, description = "Generation request", content_type = "application/json"),
    responses(
        (status = 201, description = "New entry created", body = MessageResponse),
        (status = 200, description = "Existing entry replaced", body = MessageResponse),
        (status = 400, description = "Missing required fields (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Document store failure (STORAGE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn queue_request(
    State(state): State<AppState>,
    AppJson(payload): AppJson<Fields>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state.generate.upsert(payload).await?;

    let message = match outcome {
        UpsertOutcome::Created => "Request queued successfully (new entry created).",
        UpsertOutcome::Replaced => "Request updated successfully (existing entry replaced).",
    };
    Ok((upsert_status(outcome), Json(MessageResponse::new(message))))
}

#[utoipa::path(
    get,
    path = "/generate",
    tag = "Generation Requests",
    operation_id = "listGenerationRequests",
    summary = "List all generation requests",
    description = "Returns every stored request in insertion order, each with its store id as `_id`.",
    responses(
        (status = 200, description = "All requests", body = [Object]),
        (status = 500, description = "Document store failure (STORAGE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_requests(State(state): State<AppState>) -> Result<Json<Vec<Value>>, AppError> {
    let docs = state.generate.find_all().await?;
    Ok(Json(docs.into_iter().map(|d| d.into_json()).collect()))
}

#[utoipa::path(
    delete,
    path = "/generate",
    tag = "Generation Requests",
    operation_id = "deleteGenerationRequest",
    summary = "Delete a generation request",
    request_body(content = Object, description = "`{\"imageName\": ...}`", content_type = "application/json"),
    responses(
        (status = 200, description = "Request deleted", body = MessageResponse),
        (status = 400, description = "Missing imageName (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "No such request (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Document store failure (STORAGE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn delete_request(
    State(state): State<AppState>,
    AppJson(payload): AppJson<Fields>,
) -> Result<Json<MessageResponse>, AppError> {
    let filter = state.generate.family().key_filter(&payload)?;

    match state.generate.delete(&filter).await? {
        DeleteOutcome::Deleted => Ok(Json(MessageResponse::new("Request deleted successfully."))),
        DeleteOutcome::NotFound => Err(AppError::NotFound("Generation request not found".into())),
    }
}
