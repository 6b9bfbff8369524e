//! Adapter configuration errors
//!
//! Request-time failures are reported as `PortError`; these errors only occur
//! while the adapter is being built.

use thiserror::Error;

/// Errors that can occur while configuring the HTTP adapter
#[derive(Debug, Error)]
pub enum HttpConfigError {
    /// The base URL could not be parsed
    #[error("Invalid service URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The base URL cannot carry a path (e.g. `mailto:`)
    #[error("Service URL cannot carry an API path: {0}")]
    NotHierarchical(String),

    /// Routing mode other than `direct` or `gateway`
    #[error("Unknown routing mode '{0}', expected 'direct' or 'gateway'")]
    UnknownRouting(String),

    /// The HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}
