use axum::http::StatusCode;
use common::UpsertOutcome;
use serde::Serialize;

/// Plain acknowledgement returned by write endpoints.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Request queued successfully (new entry created).")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 201 for a new entry, 200 for a replaced one.
pub fn upsert_status(outcome: UpsertOutcome) -> StatusCode {
    match outcome {
        UpsertOutcome::Created => StatusCode::CREATED,
        UpsertOutcome::Replaced => StatusCode::OK,
    }
}
