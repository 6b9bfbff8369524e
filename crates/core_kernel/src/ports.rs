//! Ports and Adapters Infrastructure
//!
//! This module provides the foundational types for the hexagonal
//! architecture used by the review desk.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Review Desk                              │
//! │        (queue loader, review panel, decision submitter)      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ClaimsPort                              │
//! │         defined in domain_claims, depends on core_kernel     │
//! └─────────────────────────────────────────────────────────────┘
//!                    ▲                         ▲
//!                    │                         │
//!         ┌─────────┴─────────┐     ┌────────┴────────┐
//!         │   HTTP Adapter    │     │   Mock Adapter   │
//!         │ (remote claims    │     │   (in-memory,    │
//!         │   service, REST)  │     │    for tests)    │
//!         └───────────────────┘     └──────────────────┘
//! ```
//!
//! Every adapter reports failures as [`PortError`]. Failures returned by the
//! remote service keep the `error` and `detail` strings from the response
//! body so the desk can show the most specific message available.

use std::fmt;
use thiserror::Error;
use serde::{Deserialize, Serialize};

/// Error type for port operations
///
/// Provides a unified error type that all port implementations must use,
/// ensuring consistent error handling across real and mock adapters.
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: String,
        id: String,
    },

    /// The remote service answered with a non-success status
    #[error("Request rejected with status {status}{}", message_suffix(.error))]
    Rejected {
        status: u16,
        /// `error` string from the response body
        error: Option<String>,
        /// `detail` string from the response body
        detail: Option<String>,
    },

    /// Connection to the underlying system failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The operation timed out
    #[error("Timeout after {duration_ms}ms: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
    },

    /// A response could not be decoded into the expected shape
    #[error("Transformation error: {message}")]
    Transformation {
        message: String,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Rejected error from a response status and body strings
    pub fn rejected(status: u16, error: Option<String>, detail: Option<String>) -> Self {
        PortError::Rejected { status, error, detail }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a Transformation error
    pub fn transformation(message: impl Into<String>) -> Self {
        PortError::Transformation {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// The `error` string the remote service put in its response body, if any
    pub fn server_error(&self) -> Option<&str> {
        match self {
            PortError::Rejected { error, .. } => non_blank(error.as_deref()),
            _ => None,
        }
    }

    /// The `detail` string the remote service put in its response body, if any
    pub fn server_detail(&self) -> Option<&str> {
        match self {
            PortError::Rejected { detail, .. } => non_blank(detail.as_deref()),
            _ => None,
        }
    }

    /// HTTP status of a rejected request
    pub fn status(&self) -> Option<u16> {
        match self {
            PortError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if this error indicates a transient failure that may succeed on retry
    pub fn is_transient(&self) -> bool {
        match self {
            PortError::Connection { .. } | PortError::Timeout { .. } => true,
            PortError::Rejected { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. }) || self.status() == Some(404)
    }

    /// Returns true if the remote service refused the credential
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

fn message_suffix(error: &Option<String>) -> String {
    match non_blank(error.as_deref()) {
        Some(message) => format!(": {message}"),
        None => String::new(),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Marker trait for all domain ports
///
/// All port traits should extend this marker to ensure they are
/// thread-safe and can be used in async contexts.
pub trait DomainPort: Send + Sync + 'static {}

/// Source of the bearer credential attached to outgoing requests
///
/// The credential is read on every request. A source that has no credential
/// returns `None` and the request goes out unauthenticated; the remote
/// service is responsible for rejecting it.
pub trait CredentialSource: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

/// Credential fixed at startup
#[derive(Debug, Clone, Default)]
pub struct StaticCredential(Option<String>);

impl StaticCredential {
    pub fn new(token: Option<String>) -> Self {
        Self(token.filter(|t| !t.trim().is_empty()))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl CredentialSource for StaticCredential {
    fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Health status for an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterHealth {
    /// Adapter is healthy and operational
    Healthy,
    /// Adapter is degraded but operational
    Degraded,
    /// Adapter is unhealthy and not operational
    Unhealthy,
    /// Health status is unknown
    Unknown,
}

/// Health check result for an adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    /// Adapter identifier
    pub adapter_id: String,
    /// Current health status
    pub status: AdapterHealth,
    /// Latency of the health check in milliseconds
    pub latency_ms: u64,
    /// Optional message with additional details
    pub message: Option<String>,
    /// Timestamp of the health check
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

/// Trait for adapters that support health checks
#[async_trait::async_trait]
pub trait HealthCheckable: Send + Sync {
    /// Performs a health check on the adapter
    async fn health_check(&self) -> HealthCheckResult;
}
