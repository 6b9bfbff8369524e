//! Claims Service HTTP Adapter
//!
//! Implements [`ClaimsPort`] against the remote claims service's REST API.
//!
//! # Error Handling
//!
//! Failures are mapped to `PortError` variants:
//! - Non-2xx -> `PortError::Rejected` carrying the body's `error`/`detail`
//! - Timeouts -> `PortError::Timeout`
//! - Undecodable success bodies -> `PortError::Transformation`
//! - Other transport failures -> `PortError::Connection`
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_http::{HttpClaimsAdapter, ServiceConfig};
//! use core_kernel::StaticCredential;
//!
//! let adapter = HttpClaimsAdapter::new(
//!     &ServiceConfig::direct("http://localhost:8000"),
//!     Arc::new(StaticCredential::new(Some(token))),
//! )?;
//! let pending = adapter.list_pending().await?;
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use core_kernel::{
    AdapterHealth, ClaimId, CredentialSource, DomainPort, HealthCheckResult, HealthCheckable,
    PortError,
};
use domain_claims::{
    AdminSummary, Claim, ClaimsPort, ClusterQuery, ClusterReport, ReviewRequest, ScoringReport,
    SummaryCounters,
};

use crate::config::ServiceConfig;
use crate::dto::{claims_from_wire, summary_from_wire, ErrorBody, ScoreResponse};
use crate::error::HttpConfigError;

const USER_AGENT: &str = concat!("claims-review/", env!("CARGO_PKG_VERSION"));
const ADAPTER_ID: &str = "claims-service-http";

/// reqwest-backed adapter for the remote claims service
pub struct HttpClaimsAdapter {
    client: Client,
    root: Url,
    timeout: Duration,
    credential: Arc<dyn CredentialSource>,
}

impl std::fmt::Debug for HttpClaimsAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClaimsAdapter")
            .field("root", &self.root.as_str())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl HttpClaimsAdapter {
    /// Creates an adapter for the configured service
    ///
    /// The credential is consulted on every request; a source without a
    /// token sends requests unauthenticated.
    ///
    /// # Errors
    ///
    /// Returns `HttpConfigError` if the base URL is unusable or the client
    /// cannot be built.
    pub fn new(config: &ServiceConfig, credential: Arc<dyn CredentialSource>) -> Result<Self, HttpConfigError> {
        let root = config.api_root()?;
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        info!(routing = %config.routing, api_root = %root, "Claims service adapter configured");
        Ok(Self {
            client,
            root,
            timeout: config.timeout,
            credential,
        })
    }

    /// Base URL with the API prefix applied
    pub fn api_root(&self) -> &Url {
        &self.root
    }

    /// Builds an endpoint URL from path segments under the API root
    ///
    /// Segments are percent-encoded, so identifiers containing `/` or `?`
    /// stay inside their segment.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.root.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match self.credential.bearer_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, operation: &'static str, builder: RequestBuilder) -> Result<Response, PortError> {
        let started = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|e| self.transport_error(operation, e))?;

        let status = response.status();
        debug!(operation, status = status.as_u16(), elapsed_ms = started.elapsed().as_millis() as u64, "Claims service responded");
        if status.is_success() {
            return Ok(response);
        }

        let bytes = response.bytes().await.unwrap_or_default();
        let body = ErrorBody::parse(&bytes);
        warn!(operation, status = status.as_u16(), error = ?body.error, detail = ?body.detail, "Claims service rejected request");
        Err(PortError::rejected(status.as_u16(), body.error, body.detail))
    }

    async fn decode<T: DeserializeOwned>(&self, operation: &'static str, response: Response) -> Result<T, PortError> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(operation, e))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return serde_json::from_value(Value::Null)
                .map_err(|e| PortError::transformation(format!("{operation}: empty body ({e})")));
        }
        serde_json::from_slice(&bytes)
            .map_err(|e| PortError::transformation(format!("{operation}: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, operation: &'static str, url: Url) -> Result<T, PortError> {
        let response = self.send(operation, self.request(Method::GET, url)).await?;
        self.decode(operation, response).await
    }

    fn transport_error(&self, operation: &'static str, error: reqwest::Error) -> PortError {
        if error.is_timeout() {
            return PortError::Timeout {
                operation: operation.to_string(),
                duration_ms: self.timeout.as_millis() as u64,
            };
        }
        PortError::Connection {
            message: format!("{operation}: {error}"),
            source: Some(Box::new(error)),
        }
    }
}

impl DomainPort for HttpClaimsAdapter {}

#[async_trait]
impl HealthCheckable for HttpClaimsAdapter {
    /// Probes the summary endpoint, which every admin session can read
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let outcome = self.admin_summary().await;
        let latency_ms = start.elapsed().as_millis() as u64;

        let (status, message) = match outcome {
            Ok(_) => (AdapterHealth::Healthy, None),
            Err(e) if e.is_unauthorized() => (
                AdapterHealth::Degraded,
                Some("Service reachable but the credential was refused".to_string()),
            ),
            Err(e) => (AdapterHealth::Unhealthy, Some(e.to_string())),
        };

        HealthCheckResult {
            adapter_id: ADAPTER_ID.to_string(),
            status,
            latency_ms,
            message,
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl ClaimsPort for HttpClaimsAdapter {
    async fn list_pending(&self) -> Result<Vec<Claim>, PortError> {
        let url = self.endpoint(&["claims", "pending"]);
        let records: Option<Vec<Value>> = self.get_json("list pending claims", url).await?;
        Ok(claims_from_wire(records))
    }

    async fn admin_summary(&self) -> Result<SummaryCounters, PortError> {
        let url = self.endpoint(&["claims", "admin-summary"]);
        let summary: Option<AdminSummary> = self.get_json("load admin summary", url).await?;
        Ok(summary_from_wire(summary))
    }

    async fn score_claim(&self, claim_id: &ClaimId) -> Result<ScoringReport, PortError> {
        let url = self.endpoint(&["admin-score", "score", claim_id.as_str()]);
        let response: Option<ScoreResponse> = self.get_json("score claim", url).await?;
        Ok(response.unwrap_or_default().into_report())
    }

    async fn submit_decision(&self, claim_id: &ClaimId, request: &ReviewRequest) -> Result<(), PortError> {
        let url = self.endpoint(&["claims", claim_id.as_str(), "review"]);
        self.send("submit decision", self.request(Method::POST, url).json(request))
            .await?;
        Ok(())
    }

    async fn fraud_cluster(&self, query: &ClusterQuery) -> Result<ClusterReport, PortError> {
        let url = self.endpoint(&["fraud-cluster", query.provider_id().as_str()]);
        let builder = self
            .request(Method::GET, url)
            .query(&[("daysWindow", query.days_window())]);
        let response = self.send("fraud cluster lookup", builder).await?;
        self.decode("fraud cluster lookup", response).await
    }
}
