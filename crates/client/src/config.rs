//! Client configuration.

use std::env;

use thiserror::Error;
use url::Url;

/// Base URL used when `PAW_PARADISE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid URL for {0}: {1}")]
    InvalidUrl(String, #[source] url::ParseError),
}

/// Where the storefront server lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server origin; API paths are resolved against it.
    pub base_url: Url,
}

impl ClientConfig {
    /// Load configuration from the environment (and `.env`, if present).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `PAW_PARADISE_URL` is not a URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let raw = env::var("PAW_PARADISE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        Self::with_base_url(&raw)
    }

    /// Build a configuration for an explicit server origin.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `raw` is not a URL.
    pub fn with_base_url(raw: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(raw)
            .map_err(|e| ConfigError::InvalidUrl("PAW_PARADISE_URL".to_owned(), e))?;
        Ok(Self { base_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_base_url_rejects_garbage() {
        assert!(ClientConfig::with_base_url("not a url").is_err());
        assert!(ClientConfig::with_base_url(DEFAULT_BASE_URL).is_ok());
    }
}
