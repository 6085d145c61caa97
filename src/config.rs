//! Configuration Management
//!
//! [`ClientConfig`] is the explicit, injectable configuration handed to
//! [`crate::api::ApiClient::new`]. It can also be persisted to the user's
//! config directory and overridden from the environment.

use crate::api::request::merge_headers;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Backend root used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Environment variable overriding the base URL
pub const BASE_URL_ENV: &str = "QMS_API_BASE_URL";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_headers() -> BTreeMap<String, String> {
    BTreeMap::from([("Content-Type".to_string(), "application/json".to_string())])
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API root, e.g. `http://localhost:5000/api`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Headers sent on every call unless overridden per call
    #[serde(default = "default_headers")]
    pub default_headers: BTreeMap<String, String>,
    /// Whole-request timeout in milliseconds; absent means wait indefinitely
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Upper bound on in-flight requests; absent means unbounded
    #[serde(default)]
    pub max_concurrent_requests: Option<usize>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            default_headers: default_headers(),
            timeout_ms: None,
            max_concurrent_requests: None,
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

    /// Set a default header, replacing any existing one whose name differs only by case
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let header = BTreeMap::from([(name.into(), value.into())]);
        self.default_headers = merge_headers(&self.default_headers, &header);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX).max(1));
        self
    }

    pub fn with_max_concurrent_requests(mut self, limit: usize) -> Self {
        self.max_concurrent_requests = Some(limit);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Base URL without a trailing slash
    pub fn trimmed_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Parse and check the base URL
    pub fn parsed_base_url(&self) -> Result<Url> {
        let url = Url::parse(self.trimmed_base_url())
            .with_context(|| format!("Invalid base URL: {}", self.base_url))?;

        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("Unsupported URL scheme '{}' in {}", url.scheme(), self.base_url);
        }
        if url.query().is_some() || url.fragment().is_some() {
            anyhow::bail!("Base URL must not carry a query or fragment: {}", self.base_url);
        }

        Ok(url)
    }

    /// Transport root: the base URL's origin with no path segment
    pub fn root_url(&self) -> Result<String> {
        let mut url = self.parsed_base_url()?;
        url.set_path("/");
        url.set_query(None);
        url.set_fragment(None);
        Ok(url.to_string())
    }

    /// Apply `QMS_API_BASE_URL` if set
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                tracing::debug!("Using base URL from {}", BASE_URL_ENV);
                self.base_url = base_url.trim().to_string();
            }
        }
        self
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("qms-client").join("config.json"))
    }

    /// Load configuration from disk, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_json_content_type() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(
            config.default_headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(config.timeout(), None);
        assert_eq!(config.max_concurrent_requests, None);
    }

    #[test]
    fn test_root_url_strips_path() {
        let config = ClientConfig::new("http://localhost:5000/api/");
        assert_eq!(config.trimmed_base_url(), "http://localhost:5000/api");
        assert_eq!(config.root_url().unwrap(), "http://localhost:5000/");
    }

    #[test]
    fn test_rejects_bad_scheme() {
        assert!(ClientConfig::new("ftp://qms.local/api").parsed_base_url().is_err());
        assert!(ClientConfig::new("not a url").parsed_base_url().is_err());
    }

    #[test]
    fn test_rejects_query_and_fragment() {
        assert!(ClientConfig::new("http://qms.local/api?site=2").parsed_base_url().is_err());
        assert!(ClientConfig::new("http://qms.local/api?").parsed_base_url().is_err());
        assert!(ClientConfig::new("http://qms.local/api#top").parsed_base_url().is_err());
        assert!(ClientConfig::new("http://qms.local/api/").parsed_base_url().is_ok());
    }

    #[test]
    fn test_with_header_replaces_case_variant() {
        let config = ClientConfig::default().with_header("content-type", "text/plain");
        assert_eq!(
            config.default_headers,
            BTreeMap::from([("content-type".to_string(), "text/plain".to_string())])
        );
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_url": "https://qms.example.com/api", "timeout_ms": 30000}"#)
                .unwrap();
        assert_eq!(config.base_url, "https://qms.example.com/api");
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert!(config.default_headers.contains_key("Content-Type"));
    }

    #[test]
    fn test_builders() {
        let config = ClientConfig::new("http://qms:8080/api")
            .with_header("X-Site", "plant-2")
            .with_timeout(Duration::from_millis(10))
            .with_max_concurrent_requests(4);
        assert_eq!(config.default_headers.len(), 2);
        assert_eq!(config.timeout_ms, Some(10));
        assert_eq!(config.max_concurrent_requests, Some(4));
    }
}
