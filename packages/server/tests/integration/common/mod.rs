use std::net::SocketAddr;
use std::sync::Arc;

use ::common::DocumentStore;
use ::common::storage::memory::MemoryDocumentStore;
use ::common::storage::unavailable::UnavailableStore;
use reqwest::Client;
use serde_json::Value;

use diary_server::config::{
    AppConfig, CorsConfig, DatabaseConfig, ImageConfig, ImageServeMode, ServerConfig,
    TriggerConfig,
};
use diary_server::state::AppState;

pub mod routes {
    pub const GENERATE: &str = "/generate";
    pub const IMAGE: &str = "/image";
    pub const LOGIN: &str = "/login";
    pub const SIGNUP: &str = "/signup";
    pub const GENERATION_SCRIPT: &str = "/generationscript";

    pub fn image(filename: &str) -> String {
        format!("/image/{filename}")
    }
}

/// Config used by every test server unless a test overrides it.
pub fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors: CorsConfig {
                allow_origins: vec![],
                max_age: 3600,
            },
        },
        database: DatabaseConfig {
            url: Some("memory://".to_string()),
            connect_timeout_secs: 1,
        },
        image: ImageConfig {
            serve_mode: ImageServeMode::BinaryStream,
            max_upload_bytes: 1024 * 1024,
        },
        trigger: TriggerConfig {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), "echo done".to_string()],
            username: Some("generator".to_string()),
            password: Some("hunter2".to_string()),
        },
    }
}

/// A running test server.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub store: Arc<dyn DocumentStore>,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(test_config()).await
    }

    pub async fn spawn_with(config: AppConfig) -> Self {
        Self::spawn_with_store(config, Arc::new(MemoryDocumentStore::new())).await
    }

    /// A server whose document store never came up.
    pub async fn spawn_degraded() -> Self {
        Self::spawn_with_store(
            test_config(),
            Arc::new(UnavailableStore::new("connection refused")),
        )
        .await
    }

    pub async fn spawn_with_store(config: AppConfig, store: Arc<dyn DocumentStore>) -> Self {
        let state = AppState::new(config, store.clone());
        let app = diary_server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            store,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_empty(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    /// GET returning the raw response, for binary bodies and headers.
    pub async fn get_raw(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request")
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    pub async fn delete_with_body(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    /// Upload an image as a `file` part, optionally with a `filename` text field.
    pub async fn upload_image(
        &self,
        part_name: &str,
        bytes: Vec<u8>,
        filename_field: Option<&str>,
    ) -> TestResponse {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(part_name.to_string())
            .mime_str("application/octet-stream")
            .expect("Failed to set MIME type");
        let mut form = reqwest::multipart::Form::new().part("file", part);
        if let Some(name) = filename_field {
            form = form.text("filename", name.to_string());
        }

        let res = self
            .client
            .post(self.url(routes::IMAGE))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart upload request");

        TestResponse::from_response(res).await
    }

    /// Sign up a user, asserting success.
    pub async fn create_user(&self, username: &str, password: &str) {
        let res = self
            .post(
                routes::SIGNUP,
                &serde_json::json!({"username": username, "password": password}),
            )
            .await;
        assert_eq!(res.status, 201, "Signup failed: {}", res.text);
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }
}
