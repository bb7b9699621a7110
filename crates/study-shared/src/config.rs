//! Configuration management

use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use crate::constants::{
    DEFAULT_ACCESS_TOKEN_EXPIRY, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_OTP_EXPIRY,
    DEFAULT_REFRESH_COOKIE, DEFAULT_REFRESH_TOKEN_EXPIRY, DEFAULT_SESSION_COOKIE,
};
use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    pub cookie: CookieSettings,
    pub storage: StorageSettings,
    pub password_reset: PasswordResetSettings,
    pub log: LogSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub cors_origin: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseDriver {
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub driver: DatabaseDriver,
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Expiry values are in seconds.
#[derive(Debug, Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub access_token_expiry: i64,
    pub refresh_token_expiry: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CookieSettings {
    pub session_name: String,
    pub refresh_name: String,
    pub secure: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    /// Directory uploaded objects are written to
    pub root: String,
    /// Public URL prefix the stored objects are served under
    pub public_base_url: String,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PasswordResetSettings {
    pub otp_expiry: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub level: String,
    pub json: bool,
    pub dir: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;
        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> Result<Self, AppError> {
        let loaded: AppConfig = config.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 8080)?
            .set_default("app.name", "study-server")?
            .set_default("app.cors_origin", "http://localhost:5173")?
            .set_default("database.driver", "postgres")?
            .set_default("database.url", "")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("jwt.secret", "")?
            .set_default("jwt.access_token_expiry", DEFAULT_ACCESS_TOKEN_EXPIRY)?
            .set_default("jwt.refresh_token_expiry", DEFAULT_REFRESH_TOKEN_EXPIRY)?
            .set_default("cookie.session_name", DEFAULT_SESSION_COOKIE)?
            .set_default("cookie.refresh_name", DEFAULT_REFRESH_COOKIE)?
            .set_default("cookie.secure", false)?
            .set_default("storage.root", "uploads")?
            .set_default("storage.public_base_url", "/uploads")?
            .set_default("storage.max_upload_bytes", DEFAULT_MAX_UPLOAD_BYTES as i64)?
            .set_default("password_reset.otp_expiry", DEFAULT_OTP_EXPIRY)?
            .set_default("log.level", "info")?
            .set_default("log.json", true)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(AppError::InvalidConfig("jwt.secret must be set".into()));
        }
        if self.jwt.access_token_expiry <= 0 || self.jwt.refresh_token_expiry <= 0 {
            return Err(AppError::InvalidConfig("token expiry must be positive".into()));
        }
        if self.database.driver == DatabaseDriver::Postgres && self.database.url.is_empty() {
            return Err(AppError::InvalidConfig("database.url must be set for postgres".into()));
        }
        Ok(())
    }
}
