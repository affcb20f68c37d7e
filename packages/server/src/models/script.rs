use serde::Serialize;

/// Result of a successful generation script run.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ScriptResponse {
    #[schema(example = "Generation script completed")]
    pub message: String,
    /// Trailing part of the script's standard output.
    #[schema(example = "Generated 3 images")]
    pub output: String,
}
