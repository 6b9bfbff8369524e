//! Remote service configuration
//!
//! This module decides which base URL the adapter talks to and applies the
//! API prefix to it. The prefix is added as path segments, never by string
//! concatenation, so a base URL that already ends in the prefix does not get
//! it twice.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;

use crate::error::HttpConfigError;

/// How requests reach the claims service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseRouting {
    /// Straight to the service's own origin
    #[default]
    Direct,
    /// Through a same-origin gateway that proxies the API prefix
    Gateway,
}

impl FromStr for BaseRouting {
    type Err = HttpConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(BaseRouting::Direct),
            "gateway" | "proxy" => Ok(BaseRouting::Gateway),
            other => Err(HttpConfigError::UnknownRouting(other.to_string())),
        }
    }
}

impl fmt::Display for BaseRouting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseRouting::Direct => f.write_str("direct"),
            BaseRouting::Gateway => f.write_str("gateway"),
        }
    }
}

/// Configuration for the claims service adapter
///
/// # Example
///
/// ```rust
/// use infra_http::ServiceConfig;
/// use std::time::Duration;
///
/// let config = ServiceConfig::direct("http://localhost:8000")
///     .api_prefix("/api")
///     .timeout(Duration::from_secs(10));
/// assert_eq!(config.api_root().unwrap().as_str(), "http://localhost:8000/api");
/// ```
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Which of the two base URLs is used
    pub routing: BaseRouting,
    /// Origin of the claims service itself
    pub service_url: String,
    /// Origin of the gateway that proxies the prefix
    pub gateway_url: String,
    /// Path prefix under which every endpoint lives
    pub api_prefix: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ServiceConfig {
    /// Creates a configuration that calls the service directly
    ///
    /// # Arguments
    ///
    /// * `service_url` - Origin of the claims service (e.g., "http://localhost:8000")
    pub fn direct(service_url: impl Into<String>) -> Self {
        Self {
            routing: BaseRouting::Direct,
            service_url: service_url.into(),
            ..Self::default()
        }
    }

    /// Creates a configuration that goes through a gateway
    ///
    /// # Arguments
    ///
    /// * `gateway_url` - Origin of the gateway (e.g., "http://localhost:5173")
    pub fn gateway(gateway_url: impl Into<String>) -> Self {
        Self {
            routing: BaseRouting::Gateway,
            gateway_url: gateway_url.into(),
            ..Self::default()
        }
    }

    /// Sets the API prefix (default: "/api")
    pub fn api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = prefix.into();
        self
    }

    /// Sets the per-request timeout (default: 30s)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The base URL selected by the routing mode
    pub fn base_url(&self) -> &str {
        match self.routing {
            BaseRouting::Direct => &self.service_url,
            BaseRouting::Gateway => &self.gateway_url,
        }
    }

    /// The base URL with the API prefix applied exactly once
    ///
    /// # Errors
    ///
    /// Returns `HttpConfigError::InvalidUrl` if the base URL does not parse
    /// and `HttpConfigError::NotHierarchical` if it cannot carry a path.
    pub fn api_root(&self) -> Result<Url, HttpConfigError> {
        let base = self.base_url();
        let mut url = Url::parse(base).map_err(|e| HttpConfigError::InvalidUrl {
            url: base.to_string(),
            reason: e.to_string(),
        })?;

        let prefix: Vec<&str> = self.api_prefix.split('/').filter(|s| !s.is_empty()).collect();
        let existing: Vec<String> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).map(str::to_string).collect())
            .unwrap_or_default();
        let already_prefixed = !prefix.is_empty()
            && existing.len() >= prefix.len()
            && existing[existing.len() - prefix.len()..]
                .iter()
                .zip(&prefix)
                .all(|(have, want)| have == want);

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| HttpConfigError::NotHierarchical(base.to_string()))?;
            segments.pop_if_empty();
            if !already_prefixed {
                segments.extend(&prefix);
            }
        }
        url.set_query(None);
        url.set_fragment(None);
        Ok(url)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            routing: BaseRouting::Direct,
            service_url: "http://localhost:8000".to_string(),
            gateway_url: "http://localhost:5173".to_string(),
            api_prefix: "/api".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ServiceConfig::gateway("http://portal.local")
            .api_prefix("v2/api")
            .timeout(Duration::from_secs(5));

        assert_eq!(config.routing, BaseRouting::Gateway);
        assert_eq!(config.base_url(), "http://portal.local");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.api_root().unwrap().as_str(), "http://portal.local/v2/api");
    }

    #[test]
    fn test_prefix_applied_once() {
        for base in ["http://svc:8000", "http://svc:8000/", "http://svc:8000/api", "http://svc:8000/api/"] {
            let root = ServiceConfig::direct(base).api_root().unwrap();
            assert_eq!(root.as_str(), "http://svc:8000/api", "base {base}");
        }
    }

    #[test]
    fn test_prefix_kept_under_mount_path() {
        let root = ServiceConfig::direct("http://svc/claims-portal").api_root().unwrap();
        assert_eq!(root.as_str(), "http://svc/claims-portal/api");
    }

    #[test]
    fn test_empty_prefix() {
        let root = ServiceConfig::direct("http://svc/").api_prefix("/").api_root().unwrap();
        assert_eq!(root.path(), "/");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            ServiceConfig::direct("not a url").api_root(),
            Err(HttpConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            ServiceConfig::direct("mailto:ops@example.com").api_root(),
            Err(HttpConfigError::NotHierarchical(_))
        ));
    }

    #[test]
    fn test_routing_parse() {
        assert_eq!("Gateway".parse::<BaseRouting>().unwrap(), BaseRouting::Gateway);
        assert_eq!(" direct ".parse::<BaseRouting>().unwrap(), BaseRouting::Direct);
        assert!("sideways".parse::<BaseRouting>().is_err());
    }
}
