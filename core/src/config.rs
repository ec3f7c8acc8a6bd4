//! Connection settings for the remote todo resource.
//!
//! Defaults point at the hosted todo service with a 10 second per-request
//! timeout. `from_env` lets a host override both without recompiling.

use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://pab-be-todos.vercel.app";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const BASE_URL_ENV: &str = "TODO_API_BASE_URL";
pub const TIMEOUT_ENV: &str = "TODO_API_TIMEOUT_SECS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{TIMEOUT_ENV} must be a positive number of seconds, got {0:?}")]
    InvalidTimeout(String),

    #[error("base URL must not be empty")]
    EmptyBaseUrl,

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `TODO_API_BASE_URL` and `TODO_API_TIMEOUT_SECS`, falling back to
    /// the defaults for whichever is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(base_url) = lookup(BASE_URL_ENV) {
            if base_url.trim().is_empty() {
                return Err(ConfigError::EmptyBaseUrl);
            }
            config.base_url = base_url.trim().to_string();
        }
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
            if secs == 0 {
                return Err(ConfigError::InvalidTimeout(raw));
            }
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn env_overrides_base_url_and_timeout() {
        let config = ClientConfig::from_lookup(lookup(&[
            (BASE_URL_ENV, "http://127.0.0.1:3000"),
            (TIMEOUT_ENV, "3"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:3000");
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[(TIMEOUT_ENV, "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout(_)));
        let err = ClientConfig::from_lookup(lookup(&[(TIMEOUT_ENV, "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout(_)));
    }

    #[test]
    fn blank_base_url_is_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[(BASE_URL_ENV, "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyBaseUrl));
    }
}
