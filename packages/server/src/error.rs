use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::{RecordError, StorageError};
use serde::Serialize;

use crate::script::ScriptError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`,
    /// `INVALID_CREDENTIALS`, `NOT_FOUND`, `CONFLICT`, `USERNAME_TAKEN`,
    /// `PAYLOAD_TOO_LARGE`, `STORAGE_ERROR`, `EXTERNAL_PROCESS_ERROR`,
    /// `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Missing required fields: imageName")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    InvalidCredentials,
    NotFound(String),
    Conflict(String),
    UsernameTaken,
    PayloadTooLarge(String),
    /// The document store is unreachable or rejected the operation.
    Storage(String),
    /// The generation script could not be run or exited unsuccessfully.
    ExternalProcess(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "INVALID_CREDENTIALS",
                    message: "Invalid username or password".into(),
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "CONFLICT",
                    message: msg,
                },
            ),
            AppError::UsernameTaken => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "USERNAME_TAKEN",
                    message: "Username is already taken".into(),
                },
            ),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorBody {
                    code: "PAYLOAD_TOO_LARGE",
                    message: msg,
                },
            ),
            AppError::Storage(detail) => {
                tracing::error!("Storage error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "STORAGE_ERROR",
                        message: detail,
                    },
                )
            }
            AppError::ExternalProcess(detail) => {
                tracing::error!("Generation script failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "EXTERNAL_PROCESS_ERROR",
                        message: detail,
                    },
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<RecordError> for AppError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::Validation(msg) => AppError::Validation(msg),
            RecordError::NotFound(msg) => AppError::NotFound(msg),
            RecordError::Conflict(msg) => AppError::Conflict(msg),
            RecordError::Storage(e) => AppError::from(e),
            RecordError::Hash(detail) => AppError::Internal(detail),
        }
    }
}

impl From<ScriptError> for AppError {
    fn from(err: ScriptError) -> Self {
        match err {
            ScriptError::MissingCredentials(_) => AppError::Validation(err.to_string()),
            _ => AppError::ExternalProcess(err.to_string()),
        }
    }
}
