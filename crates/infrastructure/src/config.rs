//! HTTP client configuration.
//!
//! Defaults suit local test servers; each setting can be overridden through
//! the environment.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding [`ClientConfig::user_agent`].
pub const ENV_USER_AGENT: &str = "SUPERTEST_USER_AGENT";
/// Environment variable overriding [`ClientConfig::max_redirects`].
pub const ENV_MAX_REDIRECTS: &str = "SUPERTEST_MAX_REDIRECTS";
/// Environment variable overriding [`ClientConfig::timeout_ms`].
pub const ENV_TIMEOUT_MS: &str = "SUPERTEST_TIMEOUT_MS";

/// Errors raised while reading configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A numeric setting could not be parsed.
    #[error("invalid value for {key}: '{value}' is not a number")]
    InvalidNumber {
        /// The environment variable.
        key: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Settings of the HTTP transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// User-Agent header sent with every request.
    pub user_agent: String,
    /// Maximum number of redirects followed.
    pub max_redirects: usize,
    /// Total request timeout; the transport default applies when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("supertest/", env!("CARGO_PKG_VERSION")).to_string(),
            max_redirects: 10,
            timeout_ms: None,
        }
    }
}

impl ClientConfig {
    /// Reads the defaults, overridden by `SUPERTEST_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidNumber`] if a numeric variable is not a number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the defaults, overridden by the values `lookup` returns.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidNumber`] if a numeric value is not a number.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(user_agent) = lookup(ENV_USER_AGENT).filter(|v| !v.trim().is_empty()) {
            config.user_agent = user_agent;
        }
        if let Some(value) = lookup(ENV_MAX_REDIRECTS) {
            config.max_redirects = parse_number(ENV_MAX_REDIRECTS, &value)?;
        }
        if let Some(value) = lookup(ENV_TIMEOUT_MS) {
            config.timeout_ms = Some(parse_number(ENV_TIMEOUT_MS, &value)?);
        }

        Ok(config)
    }

    /// Sets the request timeout (builder pattern).
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber {
            key,
            value: value.to_string(),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert!(config.user_agent.starts_with("supertest/"));
        assert_eq!(config.max_redirects, 10);
        assert_eq!(config.timeout_ms, None);
    }

    #[test]
    fn test_no_overrides_yields_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_USER_AGENT, "ci-suite/2"),
            (ENV_MAX_REDIRECTS, "3"),
            (ENV_TIMEOUT_MS, " 1500 "),
        ]))
        .unwrap();

        assert_eq!(config.user_agent, "ci-suite/2");
        assert_eq!(config.max_redirects, 3);
        assert_eq!(config.timeout_ms, Some(1500));
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        let result = ClientConfig::from_lookup(lookup(&[(ENV_TIMEOUT_MS, "soon")]));
        assert_eq!(
            result,
            Err(ConfigError::InvalidNumber {
                key: ENV_TIMEOUT_MS,
                value: "soon".to_string(),
            })
        );
    }

    #[test]
    fn test_deserialize_fills_missing_fields() {
        let config: ClientConfig = serde_json::from_str(r#"{"timeout_ms": 250}"#).unwrap();
        assert_eq!(config.timeout_ms, Some(250));
        assert_eq!(config.max_redirects, 10);
    }
}
