use std::env;
use std::fmt;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub cookie: CookieConfig,
}

#[derive(Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    pub access_token_expire_minutes: i64,
    pub refresh_token_expire_days: i64,
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CookieConfig {
    /// Mark the refresh cookie `Secure` (HTTPS only).
    #[serde(default)]
    pub secure: bool,
}

// Connection strings and signing secrets never reach the logs.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_secret", &"<redacted>")
            .field("refresh_secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field(
                "access_token_expire_minutes",
                &self.access_token_expire_minutes,
            )
            .field("refresh_token_expire_days", &self.refresh_token_expire_days)
            .finish()
    }
}

impl JwtConfig {
    /// Token settings for the auth library.
    ///
    /// # Errors
    /// * `ConfigError::Message` - A token lifetime is not positive or out of range
    pub fn token_settings(&self) -> Result<auth::TokenSettings, ConfigError> {
        Ok(auth::TokenSettings {
            access_secret: self.access_secret.clone(),
            refresh_secret: self.refresh_secret.clone(),
            algorithm: self.algorithm.clone(),
            access_ttl: lifetime(
                "jwt.access_token_expire_minutes",
                self.access_token_expire_minutes,
                chrono::Duration::try_minutes,
            )?,
            refresh_ttl: lifetime(
                "jwt.refresh_token_expire_days",
                self.refresh_token_expire_days,
                chrono::Duration::try_days,
            )?,
        })
    }
}

fn lifetime(
    key: &str,
    value: i64,
    convert: fn(i64) -> Option<chrono::Duration>,
) -> Result<chrono::Duration, ConfigError> {
    convert(value)
        .filter(|ttl| *ttl > chrono::Duration::zero())
        .ok_or_else(|| {
            ConfigError::Message(format!(
                "{} must be positive and in range, got {}",
                key, value
            ))
        })
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__ACCESS_SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        // Example: JWT__REFRESH_SECRET=... overrides jwt.refresh_secret
        Self::load_with(Environment::default().separator("__"))
    }

    fn load_with(environment: Environment) -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(environment)
            .build()?;

        configuration.try_deserialize()
    }
}
