use common::storage::StorageConfig;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
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
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// HMAC key for issued tokens. Required.
    pub jwt_secret: String,
    /// Lifetime of issued tokens in hours.
    pub token_ttl_hours: i64,
    /// Bootstrap admin account created at startup when both are set.
    #[serde(default)]
    pub admin_username: Option<String>,
    #[serde(default)]
    pub admin_password: Option<String>,
}

/// Midtrans Snap settings. Payments are disabled without a server key.
#[derive(Debug, Deserialize, Clone)]
pub struct PaymentConfig {
    #[serde(default)]
    pub server_key: Option<String>,
    pub snap_url: String,
    pub api_url: String,
    /// Payment link lifetime in hours.
    pub expiry_hours: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    pub payment: PaymentConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::builder()?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., DONATION__DATABASE__URL)
            .add_source(
                Environment::with_prefix("DONATION")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors.allow_origins")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("auth.token_ttl_hours", 168)?
            .set_default(
                "payment.snap_url",
                "https://app.sandbox.midtrans.com/snap/v1",
            )?
            .set_default("payment.api_url", "https://api.sandbox.midtrans.com")?
            .set_default("payment.expiry_hours", 24)
    }
}
