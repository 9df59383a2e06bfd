//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `STOREFRONT_SESSION_SECRET` - Random secret, at least 32 characters
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_CATALOG_PATH` - Product catalog JSON (default: crates/storefront/catalog/products.json)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0 to 1.0 (default: 0.0)

use std::collections::BTreeMap;
use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CATALOG_PATH: &str = "crates/storefront/catalog/products.json";

const MIN_SECRET_LEN: usize = 32;
/// Shannon entropy floor, bits per character.
const MIN_SECRET_ENTROPY: f64 = 3.3;

/// Fragments that give away a value copied from an example file.
const PLACEHOLDER_FRAGMENTS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "pawparadise",
    "xxx",
    "todo",
    "fixme",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid environment variable {key}: {reason}")]
    InvalidEnvVar { key: &'static str, reason: String },

    #[error("Insecure secret in {key}: {reason}")]
    InsecureSecret { key: &'static str, reason: String },
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` connection URL (contains password)
    pub database_url: SecretString,
    pub host: IpAddr,
    pub port: u16,
    /// Public URL shoppers reach the storefront on
    pub base_url: Url,
    /// Checked for strength at startup. Session ids are random and stored
    /// server-side, so nothing is signed with it yet.
    pub session_secret: SecretString,
    /// Product catalog document served at `/api/catalog`
    pub catalog_path: PathBuf,
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
    pub sentry_sample_rate: f32,
    pub sentry_traces_sample_rate: f32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables, reading `.env` first
    /// if there is one.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for a missing required variable, a value that
    /// does not parse, or a weak session secret.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let database_url = var("STOREFRONT_DATABASE_URL")
            .or_else(|| var("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or(ConfigError::MissingEnvVar("STOREFRONT_DATABASE_URL"))?;

        let base_url = Url::parse(&required("STOREFRONT_BASE_URL")?)
            .map_err(|e| invalid("STOREFRONT_BASE_URL", e))?;

        let session_secret = required("STOREFRONT_SESSION_SECRET")?;
        check_session_secret(&session_secret).map_err(|reason| ConfigError::InsecureSecret {
            key: "STOREFRONT_SESSION_SECRET",
            reason,
        })?;

        Ok(Self {
            database_url,
            host: parsed("STOREFRONT_HOST", IpAddr::V4(Ipv4Addr::LOCALHOST))?,
            port: parsed("STOREFRONT_PORT", DEFAULT_PORT)?,
            base_url,
            session_secret: SecretString::from(session_secret),
            catalog_path: var("STOREFRONT_CATALOG_PATH")
                .map_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH), PathBuf::from),
            sentry_dsn: var("SENTRY_DSN"),
            sentry_environment: var("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: sample_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: sample_rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether shoppers reach us over HTTPS (session cookies get `Secure`).
    #[must_use]
    pub fn is_https(&self) -> bool {
        self.base_url.scheme() == "https"
    }
}

// =============================================================================
// Environment helpers
// =============================================================================

/// A set, non-blank variable.
fn var(key: &'static str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    var(key).ok_or(ConfigError::MissingEnvVar(key))
}

fn invalid(key: &'static str, reason: impl Display) -> ConfigError {
    ConfigError::InvalidEnvVar {
        key,
        reason: reason.to_string(),
    }
}

/// Parse `key` if set, else use `default`.
fn parsed<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    var(key).map_or(Ok(default), |raw| {
        raw.trim().parse().map_err(|e| invalid(key, e))
    })
}

fn sample_rate(key: &'static str, default: f32) -> Result<f32, ConfigError> {
    check_sample_rate(key, parsed(key, default)?)
}

fn check_sample_rate(key: &'static str, rate: f32) -> Result<f32, ConfigError> {
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(invalid(
            key,
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ))
    }
}

// =============================================================================
// Secret strength
// =============================================================================

/// Refuse short, placeholder-looking and low-entropy secrets.
fn check_session_secret(secret: &str) -> Result<(), String> {
    let len = secret.chars().count();
    if len < MIN_SECRET_LEN {
        return Err(format!(
            "must be at least {MIN_SECRET_LEN} characters (got {len})"
        ));
    }

    let lower = secret.to_lowercase();
    if let Some(fragment) = PLACEHOLDER_FRAGMENTS.iter().find(|f| lower.contains(*f)) {
        return Err(format!("looks like a placeholder (contains '{fragment}')"));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_SECRET_ENTROPY {
        return Err(format!(
            "entropy too low ({entropy:.2} bits/char, need {MIN_SECRET_ENTROPY:.1}); use a randomly generated value"
        ));
    }

    Ok(())
}

/// Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    let mut counts: BTreeMap<char, u32> = BTreeMap::new();
    for c in s.chars() {
        *counts.entry(c).or_default() += 1;
    }

    let total: u32 = counts.values().sum();
    if total == 0 {
        return 0.0;
    }
    let total = f64::from(total);

    counts
        .values()
        .map(|&n| {
            let p = f64::from(n) / total;
            -p * p.log2()
        })
        .sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const STRONG: &str = "k3J9x!pQ2#vL8mZ4@wR7tY1&nB6cF0hD";

    fn config(base_url: &str) -> StorefrontConfig {
        StorefrontConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            base_url: Url::parse(base_url).unwrap(),
            session_secret: SecretString::from(STRONG),
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    #[test]
    fn test_shannon_entropy() {
        assert!(shannon_entropy("").abs() < f64::EPSILON);
        assert!((shannon_entropy("abab") - 1.0).abs() < 0.001);
        // 32 distinct characters
        assert!((shannon_entropy(STRONG) - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_strong_secret_is_accepted() {
        assert!(check_session_secret(STRONG).is_ok());
    }

    #[test]
    fn test_short_secret_is_refused_first() {
        let reason = check_session_secret("changeme").unwrap_err();
        assert!(reason.contains("at least 32"));
    }

    #[test]
    fn test_placeholder_secret_is_refused() {
        let reason = check_session_secret("replace-me-with-a-long-random-value-1234").unwrap_err();
        assert!(reason.contains("placeholder"));
    }

    #[test]
    fn test_repetitive_secret_is_refused() {
        let reason = check_session_secret(&"ab".repeat(16)).unwrap_err();
        assert!(reason.contains("entropy"));
    }

    #[test]
    fn test_sample_rate_bounds() {
        assert!(check_sample_rate("RATE", 0.25).is_ok());
        assert!(matches!(
            check_sample_rate("RATE", 1.5),
            Err(ConfigError::InvalidEnvVar { key: "RATE", .. })
        ));
    }

    #[test]
    fn test_socket_addr() {
        let addr = config("http://localhost:3000").socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_is_https() {
        assert!(!config("http://localhost:3000").is_https());
        assert!(config("https://pawparadise.shop").is_https());
    }
}
