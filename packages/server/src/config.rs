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
    pub jwt_secret: String,
}

/// External image-generation provider (Replicate-compatible API).
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    pub api_token: String,
    pub base_url: String,
    /// Model version hash passed on prediction creation.
    pub version: String,
}

/// S3-compatible bucket holding the generated images.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    /// Base URL under which stored objects are publicly served. Without it
    /// the store cannot produce durable URLs and persistence fails.
    pub public_base_url: Option<String>,
    /// Per-object size cap in bytes.
    pub max_object_size: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CreditsConfig {
    /// Balance granted when a profile is created on first generation.
    pub starting_balance: i32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub provider: ProviderConfig,
    pub storage: StorageConfig,
    pub credits: CreditsConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("provider.base_url", "https://api.replicate.com")?
            .set_default(
                "provider.version",
                "dee76b5afde21b0f01ed7925f0665b7e879c50ee718c5f78a9d38e04d523cc5e",
            )?
            .set_default("storage.region", "us-east-1")?
            .set_default("storage.max_object_size", 1024 * 1024)?
            .set_default("credits.starting_balance", 2)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., EMOJIHUB__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("EMOJIHUB").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
