use serde_json::json;

use crate::common::{TestApp, routes, test_config};

#[tokio::test]
async fn degraded_store_fails_storage_routes_at_call_time() {
    let app = TestApp::spawn_degraded().await;

    let list = app.get(routes::GENERATE).await;
    assert_eq!(list.status, 500);
    assert_eq!(list.body["code"], "STORAGE_ERROR");
    assert!(list.text.contains("connection refused"), "{}", list.text);

    let queue = app
        .post(
            routes::GENERATE,
            &json!({"imageName": "x", "text_payload": "y"}),
        )
        .await;
    assert_eq!(queue.status, 500);

    let login = app
        .post(routes::LOGIN, &json!({"username": "a", "password": "b"}))
        .await;
    assert_eq!(login.status, 500);
    assert_eq!(login.body["code"], "STORAGE_ERROR");
}

#[tokio::test]
async fn degraded_store_still_validates_first() {
    let app = TestApp::spawn_degraded().await;

    let res = app.post(routes::GENERATE, &json!({"imageName": "x"})).await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn openapi_document_lists_every_route() {
    let app = TestApp::spawn().await;

    let res = app.get("/api-docs/openapi.json").await;

    assert_eq!(res.status, 200);
    let paths = res.body["paths"].as_object().unwrap();
    for path in [
        "/generate",
        "/image",
        "/image/{filename}",
        "/login",
        "/signup",
        "/generationscript",
    ] {
        assert!(paths.contains_key(path), "missing {path}");
    }
}

mod cors {
    use super::*;

    async fn preflight(app: &TestApp, origin: &str) -> reqwest::Response {
        app.client
            .request(
                reqwest::Method::OPTIONS,
                format!("http://{}{}", app.addr, routes::GENERATE),
            )
            .header("Origin", origin)
            .header("Access-Control-Request-Method", "POST")
            .send()
            .await
            .expect("Failed to send preflight request")
    }

    #[tokio::test]
    async fn listed_origin_is_allowed() {
        let mut config = test_config();
        config.server.cors.allow_origins = vec!["http://diary.test".to_string()];
        config.server.cors.max_age = 600;
        let app = TestApp::spawn_with(config).await;

        let res = preflight(&app, "http://diary.test").await;

        assert_eq!(
            res.headers()["access-control-allow-origin"],
            "http://diary.test"
        );
        assert_eq!(res.headers()["access-control-max-age"], "600");
    }

    #[tokio::test]
    async fn unlisted_origin_gets_no_allow_header() {
        let mut config = test_config();
        config.server.cors.allow_origins = vec!["http://diary.test".to_string()];
        let app = TestApp::spawn_with(config).await;

        let res = preflight(&app, "http://evil.test").await;

        assert!(res.headers().get("access-control-allow-origin").is_none());
    }

    #[tokio::test]
    async fn wildcard_allows_any_origin() {
        let mut config = test_config();
        config.server.cors.allow_origins = vec!["*".to_string()];
        let app = TestApp::spawn_with(config).await;

        let res = preflight(&app, "http://anywhere.test").await;

        assert_eq!(res.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn empty_origin_list_disables_cors() {
        let app = TestApp::spawn().await;

        let res = preflight(&app, "http://diary.test").await;

        assert!(res.headers().get("access-control-allow-origin").is_none());
    }
}
