use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Collection used when `POSTS_API_URL` is not set.
pub const DEFAULT_POSTS_API_URL: &str = "https://jsonplaceholder.typicode.com/posts";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Remote collection
    pub posts_api_url: String,
    pub page_limit: u32,
    pub request_timeout: Option<Duration>,

    // Web Server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let timeout_secs = parse_env_u64("REQUEST_TIMEOUT_SECS", 0)?;

        Ok(Self {
            // Remote collection
            posts_api_url: env_or_default("POSTS_API_URL", DEFAULT_POSTS_API_URL),
            page_limit: parse_env_u32("POSTS_PAGE_LIMIT", 5)?,
            request_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),

            // Web Server
            web_host: env_or_default("WEB_HOST", "127.0.0.1"),
            web_port: parse_env_u16("WEB_PORT", 8080)?,
        })
    }

    /// Configuration for tests: default collection URL, no timeout, ephemeral port.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            posts_api_url: DEFAULT_POSTS_API_URL.to_string(),
            page_limit: 5,
            request_timeout: None,
            web_host: "127.0.0.1".to_string(),
            web_port: 0,
        }
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.posts_api_url).map_err(|e| ConfigError::InvalidValue {
            name: "POSTS_API_URL".to_string(),
            message: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                name: "POSTS_API_URL".to_string(),
                message: format!("scheme must be http or https, got '{}'", url.scheme()),
            });
        }
        if self.page_limit == 0 {
            return Err(ConfigError::InvalidValue {
                name: "POSTS_PAGE_LIMIT".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u32(name: &str, default: u32) -> Result<u32, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}
