//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup, with a
//! `.env` file as the fallback source for local development (`dotenvy` never
//! overrides a variable that is already set, so the process environment
//! always wins). A missing required value is fatal at startup; nothing here
//! degrades per-request.

use std::net::SocketAddr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Selects which repository backend the service runs against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotesBackend {
    /// Hosted Postgres service, driven through sqlx.
    Postgres,
    /// Cloudflare D1-style SQL-over-HTTP store.
    D1,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub backend: NotesBackend,
    pub database_url: Option<String>,
    pub d1_endpoint: Option<String>,
    pub d1_api_token: Option<String>,
    pub auth_url: String,
    pub auth_anon_key: String,
    pub cors_origin: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Server Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Repository Backend Selection ---
        let backend_str =
            std::env::var("NOTES_BACKEND").unwrap_or_else(|_| "postgres".to_string());
        let backend = match backend_str.to_lowercase().as_str() {
            "postgres" => NotesBackend::Postgres,
            "d1" => NotesBackend::D1,
            other => {
                return Err(ConfigError::InvalidValue(
                    "NOTES_BACKEND".to_string(),
                    format!("'{}' is not a known backend (postgres, d1)", other),
                ))
            }
        };

        let database_url = std::env::var("DATABASE_URL").ok();
        let d1_endpoint = std::env::var("D1_ENDPOINT").ok();
        let d1_api_token = std::env::var("D1_API_TOKEN").ok();

        // The selected backend's values must be present in some source.
        match backend {
            NotesBackend::Postgres if database_url.is_none() => {
                return Err(ConfigError::MissingVar("DATABASE_URL".to_string()))
            }
            NotesBackend::D1 if d1_endpoint.is_none() => {
                return Err(ConfigError::MissingVar("D1_ENDPOINT".to_string()))
            }
            NotesBackend::D1 if d1_api_token.is_none() => {
                return Err(ConfigError::MissingVar("D1_API_TOKEN".to_string()))
            }
            _ => {}
        }

        // --- Auth Backend ---
        let auth_url = std::env::var("AUTH_URL")
            .map_err(|_| ConfigError::MissingVar("AUTH_URL".to_string()))?;
        let auth_anon_key = std::env::var("AUTH_ANON_KEY")
            .map_err(|_| ConfigError::MissingVar("AUTH_ANON_KEY".to_string()))?;

        let cors_origin =
            std::env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());

        Ok(Self {
            bind_address,
            log_level,
            backend,
            database_url,
            d1_endpoint,
            d1_api_token,
            auth_url,
            auth_anon_key,
            cors_origin,
        })
    }
}
