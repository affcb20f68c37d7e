use serde::Deserialize;

/// Request body for both login and signup.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CredentialsRequest {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}
