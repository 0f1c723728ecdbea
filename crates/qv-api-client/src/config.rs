//! Backend client configuration.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use url::Url;

use crate::error::ClientError;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";

/// Connection settings for the poll backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to.
    pub base_url: String,

    /// Session token sent as `Authorization: Bearer <token>`.
    #[serde(skip_serializing)]
    pub auth_token: Option<String>,

    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            auth_token: None,
            request_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(3),
        }
    }
}

impl ClientConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `QV_BACKEND_URL`: Backend base URL (default: http://localhost:3000)
    /// - `QV_AUTH_TOKEN`: Session token (default: none)
    /// - `QV_REQUEST_TIMEOUT_SECS`: Per-request timeout (default: 10)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            base_url: lookup("QV_BACKEND_URL").unwrap_or(defaults.base_url),
            auth_token: lookup("QV_AUTH_TOKEN").filter(|t| !t.is_empty()),
            request_timeout: lookup("QV_REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            connect_timeout: defaults.connect_timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Parsed base URL. Always ends with `/` so endpoint paths join under it.
    pub fn parsed_base_url(&self) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidConfig(format!("base_url {:?}: {e}", self.base_url)))?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidConfig(format!(
                "base_url {:?} must be an http(s) URL",
                self.base_url
            )));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        self.parsed_base_url()?;
        if self.request_timeout.is_zero() {
            return Err(ClientError::InvalidConfig(
                "request_timeout must be greater than zero".into(),
            ));
        }
        if self.connect_timeout.is_zero() {
            return Err(ClientError::InvalidConfig(
                "connect_timeout must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_from_env_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ClientConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_env_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("QV_BACKEND_URL", "https://api.example.org/v1"),
            ("QV_AUTH_TOKEN", "tok"),
            ("QV_REQUEST_TIMEOUT_SECS", "30"),
        ]));
        assert_eq!(config.base_url, "https://api.example.org/v1");
        assert_eq!(config.auth_token.as_deref(), Some("tok"));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_unparseable_timeout_falls_back() {
        let config = ClientConfig::from_lookup(lookup(&[("QV_REQUEST_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let config = ClientConfig::default().with_base_url("https://api.example.org/v1");
        assert_eq!(config.parsed_base_url().unwrap().as_str(), "https://api.example.org/v1/");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(ClientConfig::default().with_base_url("not a url").validate().is_err());
        assert!(ClientConfig::default().with_base_url("ftp://host").validate().is_err());

        let config = ClientConfig {
            request_timeout: Duration::ZERO,
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_with_humantime() {
        let config: ClientConfig = serde_json::from_str(
            r#"{ "base_url": "http://qv.local", "request_timeout": "2s" }"#,
        )
        .unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(2));
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
    }
}
