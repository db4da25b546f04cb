//! crates/launchpad_client/src/config.rs
//!
//! Settings for the HTTP adapters, loaded from the environment.

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ClientConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Origin of the platform API, without a trailing slash.
    pub api_base_url: String,
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Loads configuration from environment variables, reading `.env` first
    /// outside of tests.
    pub fn from_env() -> Result<Self, ClientConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("API_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ClientConfigError::MissingVar("API_BASE_URL".to_string()))?;
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ClientConfigError::InvalidValue(
                "API_BASE_URL".to_string(),
                format!("'{}' is not an http(s) URL", api_base_url),
            ));
        }

        let timeout_str = lookup("REQUEST_TIMEOUT_SECS").unwrap_or_else(|| "30".to_string());
        let request_timeout = timeout_str
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| {
                ClientConfigError::InvalidValue("REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            api_base_url,
            request_timeout,
        })
    }

    /// Joins `path` onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}
