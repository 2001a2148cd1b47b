//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `EMARKET_API_URL` - Base URL of the REST gateway (e.g. `http://localhost:8000/api/v1`)
//!
//! ## Optional
//! - `EMARKET_API_TIMEOUT_SECS` - Blanket request timeout (default: 10)
//! - `EMARKET_TOKEN` - Bearer token to seed the session with

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default request timeout, matching the browser client.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// API client configuration.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL every endpoint path is joined onto. Always ends with `/`.
    pub base_url: Url,
    /// Blanket timeout applied to every request.
    pub timeout: Duration,
    /// Optional token to start the session with.
    pub token: Option<SecretString>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl ClientConfig {
    /// Build a configuration for `base_url` with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` (keyed on `EMARKET_API_URL`) if
    /// the URL doesn't parse or isn't http(s).
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            token: None,
        })
    }

    /// Replace the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Seed the session with a token.
    #[must_use]
    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }

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

        let base_url = parse_base_url(&get_required_env("EMARKET_API_URL")?)?;
        let timeout_secs = get_env_or_default(
            "EMARKET_API_TIMEOUT_SECS",
            &DEFAULT_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("EMARKET_API_TIMEOUT_SECS".to_string(), e.to_string())
        })?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "EMARKET_API_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let token = get_optional_env("EMARKET_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .map(SecretString::from);

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            token,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse the API base URL, forcing a trailing slash so relative joins keep
/// any path prefix (`/api/v1/` + `cart` rather than `/api/cart`).
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |msg: String| ConfigError::InvalidEnvVar("EMARKET_API_URL".to_string(), msg);

    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_owned()
    } else {
        format!("{trimmed}/")
    };

    let url = Url::parse(&with_slash).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme `{}`", url.scheme())));
    }
    Ok(url)
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let config = ClientConfig::new("http://localhost:8000/api/v1").unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:8000/api/v1/");
        assert_eq!(
            config.base_url.join("cart").unwrap().as_str(),
            "http://localhost:8000/api/v1/cart"
        );
    }

    #[test]
    fn test_base_url_rejects_other_schemes() {
        assert!(matches!(
            ClientConfig::new("ftp://example.com"),
            Err(ConfigError::InvalidEnvVar(..))
        ));
        assert!(ClientConfig::new("not a url").is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ClientConfig::new("https://shop.example.com")
            .unwrap()
            .with_token(SecretString::from("super-secret-token".to_string()));
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret-token"));
    }

    #[test]
    fn test_default_timeout() {
        let config = ClientConfig::new("https://shop.example.com").unwrap();
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }
}
