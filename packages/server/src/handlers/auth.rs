use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use common::RecordError;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::auth::CredentialsRequest;
use crate::models::shared::MessageResponse;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/signup",
    tag = "Auth",
    operation_id = "signup",
    summary = "Create a user account",
    description = "Creates an account if the username is free. The password is stored as a salted Argon2id hash.",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created", body = MessageResponse),
        (status = 400, description = "Missing fields (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Username taken (USERNAME_TAKEN)", body = ErrorBody),
        (status = 500, description = "Document store failure (STORAGE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn signup(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CredentialsRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .accounts
        .signup(&payload.username, &payload.password)
        .await
        .map_err(|e| match e {
            RecordError::Conflict(_) => AppError::UsernameTaken,
            other => AppError::from(other),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User created successfully.")),
    ))
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    operation_id = "login",
    summary = "Check user credentials",
    description = "Succeeds only when both username and password match. Never modifies the account.",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Credentials valid", body = MessageResponse),
        (status = 400, description = "Missing fields (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Invalid credentials (INVALID_CREDENTIALS)", body = ErrorBody),
        (status = 500, description = "Document store failure (STORAGE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CredentialsRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let valid = state
        .accounts
        .login(&payload.username, &payload.password)
        .await?;

    if !valid {
        return Err(AppError::InvalidCredentials);
    }

    Ok(Json(MessageResponse::new("Login successful.")))
}
