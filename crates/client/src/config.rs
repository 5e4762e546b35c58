//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `TILBUD_API_URL` - Base URL of the Tilbud backend
//!
//! ## Optional
//! - `TILBUD_TOKEN_FILE` - Path for the persisted bearer token
//!   (default: `$HOME/.config/tilbud/token`)
//! - `TILBUD_HTTP_TIMEOUT_SECS` - Request timeout in seconds (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Tilbud client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend API.
    pub api_url: Url,
    /// Where the bearer token is persisted between runs.
    pub token_file: PathBuf,
    /// Timeout applied to every request.
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = get_required_env("TILBUD_API_URL")?
            .parse::<Url>()
            .map_err(|e| ConfigError::InvalidEnvVar("TILBUD_API_URL".to_owned(), e.to_string()))?;

        let token_file = get_optional_env("TILBUD_TOKEN_FILE")
            .map_or_else(default_token_file, PathBuf::from);

        let timeout_secs = get_env_or_default(
            "TILBUD_HTTP_TIMEOUT_SECS",
            &DEFAULT_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("TILBUD_HTTP_TIMEOUT_SECS".to_owned(), e.to_string())
        })?;

        Ok(Self {
            api_url,
            token_file,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Default token location, the client-side analog of the browser's single
/// well-known local-storage key.
fn default_token_file() -> PathBuf {
    std::env::var_os("HOME").map_or_else(
        || PathBuf::from(".tilbud").join("token"),
        |home| PathBuf::from(home).join(".config").join("tilbud").join("token"),
    )
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_token_file_is_under_home_config() {
        let path = default_token_file();
        assert!(path.ends_with("tilbud/token") || path.ends_with(".tilbud/token"));
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let result = "not a url".parse::<Url>();
        assert!(result.is_err());
    }
}
