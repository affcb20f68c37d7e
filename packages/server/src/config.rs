use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Allowed origins. Empty disables the CORS layer.
    #[serde(default)]
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Document store connection string. `memory://` selects the in-process store.
    /// Absent means every storage-backed route fails at call time.
    pub url: Option<String>,
    /// Connection-establishment timeout applied once at startup.
    pub connect_timeout_secs: u64,
}

/// Shape of `GET /image/{filename}` responses.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ImageServeMode {
    /// Decoded bytes as the response body.
    BinaryStream,
    /// `{filename, base64}` JSON.
    EncodedJson,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImageConfig {
    pub serve_mode: ImageServeMode,
    pub max_upload_bytes: usize,
}

/// External image generation script launched by `POST /generationscript`.
#[derive(Debug, Deserialize, Clone)]
pub struct TriggerConfig {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub image: ImageConfig,
    pub trigger: TriggerConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("DIARY_CONFIG").unwrap_or_else(|_| "config/config".to_string());

        Self::builder()?
            // Load from config/config.toml
            .add_source(File::with_name(&config_path).required(false))
            // Override from environment (e.g., DIARY__DATABASE__URL)
            .add_source(Self::environment())
            .build()?
            .try_deserialize()
    }

    /// `DIARY__*` variables. List-valued keys take comma-separated values.
    fn environment() -> Environment {
        Environment::with_prefix("DIARY")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("trigger.args")
            .with_list_parse_key("server.cors.allow_origins")
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.connect_timeout_secs", 5)?
            .set_default("image.serve_mode", "binary_stream")?
            .set_default("image.max_upload_bytes", 16 * 1024 * 1024)?
            .set_default("trigger.program", "python3")?
            .set_default("trigger.args", vec!["generate_images.py"])
    }
}
