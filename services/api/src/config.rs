//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// Path segments under `/api/` already taken by other endpoints.
const RESERVED_ADMIN_ROUTES: [&str; 4] = ["newsletter", "refine-idea", "submit-idea", "admin"];

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
    /// Enables secure cookies and turns off client-IP binding of admin sessions.
    pub production: bool,
    pub cors_origin: String,
    pub openai_api_key: Option<String>,
    pub refine_model: String,
    pub scoring_api_url: String,
    pub scoring_api_accept_invalid_certs: bool,
    pub scoring_api_timeout: Duration,
    /// Path segment of the admin login endpoint, mounted at `/api/{admin_route}`.
    pub admin_route: String,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
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
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        // --- Load Server and Database Settings ---
        let bind_address_str = var_or("BIND_ADDRESS", "0.0.0.0:3000");
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let log_level_str = var_or("RUST_LOG", "INFO");
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let production = var_or("APP_ENV", "development").eq_ignore_ascii_case("production");
        let cors_origin = var_or("CORS_ORIGIN", "http://localhost:5173");

        // --- Load the Idea Pipeline Settings ---
        let openai_api_key = lookup("OPENAI_API_KEY").filter(|k| !k.is_empty());
        let refine_model = var_or("REFINE_MODEL", "gpt-3.5-turbo");
        let scoring_api_url = var_or("SCORING_API_URL", "https://34.145.73.155/api/v1/search");
        let scoring_api_accept_invalid_certs = parse_bool(
            "SCORING_API_ACCEPT_INVALID_CERTS",
            &var_or("SCORING_API_ACCEPT_INVALID_CERTS", "false"),
        )?;
        let timeout_str = var_or("SCORING_API_TIMEOUT_SECS", "10");
        let scoring_api_timeout = timeout_str
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| {
                ConfigError::InvalidValue("SCORING_API_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        // --- Load Admin Settings ---
        let admin_route = var_or("ADMIN_ROUTE", "secure-dashboard-login")
            .trim_matches('/')
            .to_string();
        if admin_route.is_empty() || admin_route.contains('/') {
            return Err(ConfigError::InvalidValue(
                "ADMIN_ROUTE".to_string(),
                "must be a single non-empty path segment".to_string(),
            ));
        }
        if RESERVED_ADMIN_ROUTES.contains(&admin_route.as_str()) {
            return Err(ConfigError::InvalidValue(
                "ADMIN_ROUTE".to_string(),
                format!("'{}' is already used by another endpoint", admin_route),
            ));
        }
        let admin_username = lookup("ADMIN_USERNAME").filter(|v| !v.is_empty());
        let admin_password = lookup("ADMIN_PASSWORD").filter(|v| !v.is_empty());

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            production,
            cors_origin,
            openai_api_key,
            refine_model,
            scoring_api_url,
            scoring_api_accept_invalid_certs,
            scoring_api_timeout,
            admin_route,
            admin_username,
            admin_password,
        })
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(ConfigError::InvalidValue(
            key.to_string(),
            format!("'{}' is not a boolean", other),
        )),
    }
}
