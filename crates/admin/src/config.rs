//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `QUIRE_DATA_DIR` - Directory holding the JSON data files (default: data)
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `STOREFRONT_BASE_URL` - Storefront URL for previews and API docs
//!   (default: <http://localhost:3000>)
//! - `QUIRE_LOG_JSON` - Emit JSON logs when set
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 1.0)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Default data directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "data";
/// Storefront location assumed when `STOREFRONT_BASE_URL` is unset.
pub const DEFAULT_STOREFRONT_BASE_URL: &str = "http://localhost:3000";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Directory holding `content.json`, `categories.json`, `api-config.json`
    pub data_dir: PathBuf,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Where the public storefront (and its API) is served
    pub storefront_base_url: Url,
    /// Emit JSON-formatted logs
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let data_dir = PathBuf::from(get_env_or_default("QUIRE_DATA_DIR", DEFAULT_DATA_DIR));
        let host = get_env_or_default("ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ADMIN_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_PORT".to_string(), e.to_string()))?;
        let storefront_base_url = parse_base_url(
            "STOREFRONT_BASE_URL",
            &get_env_or_default("STOREFRONT_BASE_URL", DEFAULT_STOREFRONT_BASE_URL),
        )?;
        let log_json = get_optional_env("QUIRE_LOG_JSON").is_some();
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            data_dir,
            host,
            port,
            storefront_base_url,
            log_json,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Local defaults for the given data directory and storefront URL.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>, storefront_base_url: Url) -> Self {
        Self {
            data_dir: data_dir.into(),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3001,
            storefront_base_url,
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Absolute storefront URL for `path`.
    #[must_use]
    pub fn storefront_url(&self, path: &str) -> String {
        self.storefront_base_url
            .join(path)
            .map_or_else(|_| self.storefront_base_url.to_string(), String::from)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an absolute http(s) base URL.
fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be an absolute http(s) URL".to_string(),
        ));
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_storefront_url() {
        let config = AdminConfig::new(
            "data",
            Url::parse(DEFAULT_STOREFRONT_BASE_URL).unwrap(),
        );
        assert_eq!(
            config.storefront_url("/api/content"),
            "http://localhost:3000/api/content"
        );
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3001");
    }

    #[test]
    fn test_storefront_url_with_path_prefix() {
        let config = AdminConfig::new("data", Url::parse("https://example.com/site/").unwrap());
        assert_eq!(
            config.storefront_url("api/categories"),
            "https://example.com/site/api/categories"
        );
    }

    #[test]
    fn test_parse_base_url_rejects_invalid() {
        assert!(parse_base_url("TEST", "localhost:3000").is_err());
        assert!(parse_base_url("TEST", "not a url").is_err());
        assert!(parse_base_url("TEST", "http://localhost:3000").is_ok());

        let err = parse_base_url("STOREFRONT_BASE_URL", "not a url").unwrap_err();
        assert!(matches!(&err, ConfigError::InvalidEnvVar(key, _) if key == "STOREFRONT_BASE_URL"));
    }
}
