//! Console configuration

use std::time::Duration;

use serde::Deserialize;

use infra_http::{BaseRouting, HttpConfigError, ServiceConfig};

/// Console configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// `direct` or `gateway`
    pub routing: String,
    /// Claims service origin used by direct routing
    pub service_url: String,
    /// Gateway origin used by gateway routing
    pub gateway_url: String,
    /// Path prefix of every endpoint
    pub api_prefix: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Session token issued at login
    pub token: Option<String>,
    /// Log level
    pub log_level: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            routing: "direct".to_string(),
            service_url: "http://localhost:8000".to_string(),
            gateway_url: "http://localhost:5173".to_string(),
            api_prefix: "/api".to_string(),
            timeout_secs: 30,
            token: None,
            log_level: "info".to_string(),
        }
    }
}

impl ConsoleConfig {
    /// Loads configuration from `REVIEW_*` environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("REVIEW").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Adapter configuration derived from this console configuration
    ///
    /// # Errors
    ///
    /// Returns `HttpConfigError::UnknownRouting` for a routing mode other
    /// than `direct` or `gateway`.
    pub fn service_config(&self) -> Result<ServiceConfig, HttpConfigError> {
        let routing: BaseRouting = self.routing.parse()?;
        Ok(ServiceConfig {
            routing,
            service_url: self.service_url.clone(),
            gateway_url: self.gateway_url.clone(),
            api_prefix: self.api_prefix.clone(),
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
        })
    }

    /// The configured token, ignoring blank values
    pub fn token(&self) -> Option<String> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }
}
