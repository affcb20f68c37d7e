use utoipa_axum::{router::OpenApiRouter, routes};

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn api_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(generate_routes())
        .merge(image_routes(config))
        .merge(auth_routes())
        .routes(routes!(handlers::script::run_generation_script))
}

fn generate_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(
        handlers::generate::queue_request,
        handlers::generate::list_requests,
        handlers::generate::delete_request
    ))
}

fn image_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let upload = OpenApiRouter::new()
        .routes(routes!(
            handlers::image::upload_image,
            handlers::image::list_images
        ))
        .layer(handlers::image::image_upload_body_limit(
            config.image.max_upload_bytes,
        ));

    let by_name = OpenApiRouter::new().routes(routes!(
        handlers::image::get_image,
        handlers::image::delete_image
    ));

    upload.merge(by_name)
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::signup))
}
