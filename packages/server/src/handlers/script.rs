use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::models::script::ScriptResponse;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/generationscript",
    tag = "Generation",
    operation_id = "runGenerationScript",
    summary = "Run the external image generation script",
    description = "Runs the configured generation tool to completion with the configured credentials.",
    responses(
        (status = 200, description = "Script finished successfully", body = ScriptResponse),
        (status = 400, description = "Generation credentials not configured (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Script could not start or failed (EXTERNAL_PROCESS_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn run_generation_script(
    State(state): State<AppState>,
) -> Result<Json<ScriptResponse>, AppError> {
    let output = state.script.run().await?;

    Ok(Json(ScriptResponse {
        message: "Generation script completed".into(),
        output,
    }))
}
