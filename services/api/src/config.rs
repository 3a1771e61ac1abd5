//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

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

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    /// Trust the forwarded-for headers set by a fronting reverse proxy when
    /// deriving the client address.
    pub behind_proxy: bool,
    /// Lifetime of a dashboard login session, in seconds.
    pub session_lifetime_secs: i64,
    pub bootstrap_admin_username: String,
    pub bootstrap_admin_password: String,
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

        // --- Load Server and Database Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:5000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://strings.db".to_string());

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load Proxy and Session Settings ---
        let behind_proxy = std::env::var("BEHIND_PROXY")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false);

        let session_lifetime_str =
            std::env::var("SESSION_LIFETIME_SECS").unwrap_or_else(|_| "3600".to_string());
        let session_lifetime_secs = session_lifetime_str.parse::<i64>().map_err(|e| {
            ConfigError::InvalidValue("SESSION_LIFETIME_SECS".to_string(), e.to_string())
        })?;

        // --- Load Bootstrap Admin Credentials ---
        let bootstrap_admin_username =
            std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let bootstrap_admin_password =
            std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "123".to_string());

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            behind_proxy,
            session_lifetime_secs,
            bootstrap_admin_username,
            bootstrap_admin_password,
        })
    }
}
