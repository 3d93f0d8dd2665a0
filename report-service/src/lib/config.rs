use std::env;

use auth::TokenSettings;
use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    /// Absent in development: the service then runs on in-memory repositories.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    pub query_executor: QueryExecutorConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_issuer")]
    pub issuer: String,
    #[serde(default = "default_audience")]
    pub audience: String,
    #[serde(default = "default_expiration_hours")]
    pub expiration_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Paths served without a bearer token. Matched exactly, never by prefix.
    #[serde(default = "default_public_paths")]
    pub public_paths: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct QueryExecutorConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl JwtConfig {
    /// # Errors
    /// * `Message` - `expiration_hours` does not fit a duration
    pub fn token_settings(&self) -> Result<TokenSettings, ConfigError> {
        let lifetime = Duration::try_hours(self.expiration_hours).ok_or_else(|| {
            ConfigError::Message(format!(
                "jwt.expiration_hours out of range: {}",
                self.expiration_hours
            ))
        })?;

        Ok(TokenSettings::new(&self.secret, &self.issuer, &self.audience).with_lifetime(lifetime))
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            public_paths: default_public_paths(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_issuer() -> String {
    "goreport".to_string()
}

fn default_audience() -> String {
    "goreport-web".to_string()
}

fn default_expiration_hours() -> i64 {
    24
}

fn default_timeout_seconds() -> u64 {
    30
}

pub fn default_public_paths() -> Vec<String> {
    ["/health", "/api/v1/auth/login", "/jmreport/list", "/drag/list"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // AUTH__PUBLIC_PATHS=/health,/api/v1/auth/login overrides auth.public_paths
            .add_source(
                Environment::default()
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("auth.public_paths")
                    .try_parsing(true),
            )
            .build()?;

        configuration.try_deserialize()
    }
}
