use crate::core::{AppError, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

pub mod database;
pub mod jwt;
pub mod server;

pub use database::DatabaseConfig;
pub use jwt::JwtConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(AppError::Configuration(format!(
                "Invalid LOG_FORMAT '{}', expected text or json",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_format: LogFormat,
}

/// Files owned by the service
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory product images are written to
    pub images_path: PathBuf,
    /// Optional YAML file with users to seed at startup
    pub seed_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub login_rate_limit_per_minute: u32,
    pub cors_allowed_origins: Vec<String>,
}

/// Read `key` or fall back to `default`, parsing either into `T`
pub(crate) fn parse_var<T: FromStr>(key: &str, default: &str) -> Result<T> {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| AppError::Configuration(format!("Invalid {}", key)))
}

/// Split a comma-separated list, dropping empty entries
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_format: env::var("LOG_FORMAT")
                    .unwrap_or_else(|_| "text".to_string())
                    .parse()?,
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
            storage: StorageConfig {
                images_path: env::var("STORED_IMAGES_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("./images")),
                seed_file: env::var("SEED_FILE")
                    .ok()
                    .filter(|s| !s.trim().is_empty())
                    .map(PathBuf::from),
            },
            security: SecurityConfig {
                login_rate_limit_per_minute: parse_var("LOGIN_RATE_LIMIT_PER_MINUTE", "30")?,
                cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .map(|v| parse_list(&v))
                    .unwrap_or_default(),
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.jwt.validate()?;

        if self.security.login_rate_limit_per_minute == 0 {
            return Err(AppError::Configuration(
                "Login rate limit must be greater than 0".to_string(),
            ));
        }

        if self.database.pool_size > self.database.max_connections {
            return Err(AppError::Configuration(
                "DATABASE_POOL_SIZE must not exceed DATABASE_MAX_CONNECTIONS".to_string(),
            ));
        }

        if self.server.workers == 0 {
            return Err(AppError::Configuration(
                "SERVER_WORKERS must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
