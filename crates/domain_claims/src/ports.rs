//! Claims Domain Ports
//!
//! The review desk reaches the remote claims service only through the
//! [`ClaimsPort`] trait. Adapters:
//!
//! - **HTTP Adapter** (`infra_http`): the real service over REST
//! - **Mock Adapter** (`mock` feature): in-memory, with gates that hold a
//!   response back until a test releases it
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_claims::{ClaimsPort, ReviewDesk};
//! use std::sync::Arc;
//!
//! let port: Arc<dyn ClaimsPort> = Arc::new(HttpClaimsAdapter::new(config, credential)?);
//! let mut desk = ReviewDesk::new(port);
//! desk.mount();
//! ```

use async_trait::async_trait;

use core_kernel::{ClaimId, DomainPort, HealthCheckable, PortError};

use crate::claim::Claim;
use crate::cluster::{ClusterQuery, ClusterReport};
use crate::decision::ReviewRequest;
use crate::scoring::ScoringReport;
use crate::summary::SummaryCounters;

/// Operations the review desk needs from the claims service
#[async_trait]
pub trait ClaimsPort: DomainPort + HealthCheckable {
    /// Claims awaiting a decision
    async fn list_pending(&self) -> Result<Vec<Claim>, PortError>;

    /// Overall claim counters
    async fn admin_summary(&self) -> Result<SummaryCounters, PortError>;

    /// Runs the fraud model for one claim
    async fn score_claim(&self, claim_id: &ClaimId) -> Result<ScoringReport, PortError>;

    /// Persists an operator decision
    async fn submit_decision(&self, claim_id: &ClaimId, request: &ReviewRequest) -> Result<(), PortError>;

    /// Looks up the fraud ring around a provider
    async fn fraud_cluster(&self, query: &ClusterQuery) -> Result<ClusterReport, PortError>;
}

/// Mock implementation of ClaimsPort for testing
///
/// Holds claims, counters and scoring reports in memory. A successful
/// decision removes the claim from the pending list and moves it between the
/// counters, so a reload after deciding sees the change.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Mutex, MutexGuard};
    use chrono::Utc;
    use tokio::sync::oneshot;

    use core_kernel::{AdapterHealth, HealthCheckResult, ProviderId};
    use crate::claim::ClaimStatus;
    use crate::decision::Decision;

    /// Failure a mock operation should report
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum MockFailure {
        /// Non-success response with optional `error`/`detail` body strings
        Rejected {
            status: u16,
            error: Option<String>,
            detail: Option<String>,
        },
        /// Transport failure without a response
        Connection(String),
    }

    impl MockFailure {
        pub fn server_error(status: u16, error: impl Into<String>) -> Self {
            MockFailure::Rejected { status, error: Some(error.into()), detail: None }
        }

        pub fn server_detail(status: u16, detail: impl Into<String>) -> Self {
            MockFailure::Rejected { status, error: None, detail: Some(detail.into()) }
        }

        pub fn network() -> Self {
            MockFailure::Connection("network error".to_string())
        }

        fn to_port_error(&self) -> PortError {
            match self {
                MockFailure::Rejected { status, error, detail } => {
                    PortError::rejected(*status, error.clone(), detail.clone())
                }
                MockFailure::Connection(message) => PortError::connection(message.clone()),
            }
        }
    }

    /// Operation a gate can hold back
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub enum GateKey {
        Pending,
        Summary,
        Scoring(ClaimId),
        Decision(ClaimId),
    }

    /// Releases a held operation when `release` is called or the gate is dropped
    #[derive(Debug)]
    pub struct Gate(Option<oneshot::Sender<()>>);

    impl Gate {
        pub fn release(mut self) {
            if let Some(tx) = self.0.take() {
                let _ = tx.send(());
            }
        }
    }

    #[derive(Debug, Default)]
    struct MockState {
        pending: Vec<Claim>,
        summary: SummaryCounters,
        scoring: HashMap<ClaimId, ScoringReport>,
        clusters: HashMap<ProviderId, ClusterReport>,
        pending_failure: Option<MockFailure>,
        summary_failure: Option<MockFailure>,
        scoring_failures: HashMap<ClaimId, MockFailure>,
        decision_failure: Option<MockFailure>,
        submitted: Vec<(ClaimId, ReviewRequest)>,
        gates: HashMap<GateKey, oneshot::Receiver<()>>,
    }

    /// In-memory mock implementation of ClaimsPort
    #[derive(Debug, Default)]
    pub struct MockClaimsPort {
        state: Mutex<MockState>,
        pending_calls: AtomicUsize,
        summary_calls: AtomicUsize,
        scoring_calls: AtomicUsize,
    }

    impl MockClaimsPort {
        /// Creates an empty mock port
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates the pending queue; counters are derived from it
        pub fn with_pending(claims: Vec<Claim>) -> Self {
            let port = Self::new();
            {
                let mut state = port.lock();
                state.summary = SummaryCounters {
                    total: claims.len() as u64,
                    pending: claims.len() as u64,
                    approved: 0,
                    rejected: 0,
                };
                state.pending = claims;
            }
            port
        }

        pub fn set_summary(&self, summary: SummaryCounters) {
            self.lock().summary = summary;
        }

        pub fn set_scoring(&self, claim_id: ClaimId, report: ScoringReport) {
            let mut state = self.lock();
            state.scoring_failures.remove(&claim_id);
            state.scoring.insert(claim_id, report);
        }

        pub fn set_cluster(&self, report: ClusterReport) {
            self.lock().clusters.insert(report.provider_id.clone(), report);
        }

        pub fn fail_pending(&self, failure: Option<MockFailure>) {
            self.lock().pending_failure = failure;
        }

        pub fn fail_summary(&self, failure: Option<MockFailure>) {
            self.lock().summary_failure = failure;
        }

        pub fn fail_scoring(&self, claim_id: ClaimId, failure: MockFailure) {
            self.lock().scoring_failures.insert(claim_id, failure);
        }

        pub fn fail_decisions(&self, failure: Option<MockFailure>) {
            self.lock().decision_failure = failure;
        }

        /// Holds the next call for `key` until the returned gate is released
        pub fn hold(&self, key: GateKey) -> Gate {
            let (tx, rx) = oneshot::channel();
            self.lock().gates.insert(key, rx);
            Gate(Some(tx))
        }

        /// Decisions the service accepted, in order
        pub fn submitted(&self) -> Vec<(ClaimId, ReviewRequest)> {
            self.lock().submitted.clone()
        }

        pub fn pending_calls(&self) -> usize {
            self.pending_calls.load(Ordering::SeqCst)
        }

        pub fn summary_calls(&self) -> usize {
            self.summary_calls.load(Ordering::SeqCst)
        }

        pub fn scoring_calls(&self) -> usize {
            self.scoring_calls.load(Ordering::SeqCst)
        }

        fn lock(&self) -> MutexGuard<'_, MockState> {
            self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
        }

        async fn pass_gate(&self, key: GateKey) {
            let gate = self.lock().gates.remove(&key);
            if let Some(rx) = gate {
                let _ = rx.await;
            }
        }
    }

    impl DomainPort for MockClaimsPort {}

    #[async_trait]
    impl HealthCheckable for MockClaimsPort {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "mock-claims-port".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("Mock adapter always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl ClaimsPort for MockClaimsPort {
        async fn list_pending(&self) -> Result<Vec<Claim>, PortError> {
            self.pending_calls.fetch_add(1, Ordering::SeqCst);
            self.pass_gate(GateKey::Pending).await;
            let state = self.lock();
            match &state.pending_failure {
                Some(failure) => Err(failure.to_port_error()),
                None => Ok(state.pending.clone()),
            }
        }

        async fn admin_summary(&self) -> Result<SummaryCounters, PortError> {
            self.summary_calls.fetch_add(1, Ordering::SeqCst);
            self.pass_gate(GateKey::Summary).await;
            let state = self.lock();
            match &state.summary_failure {
                Some(failure) => Err(failure.to_port_error()),
                None => Ok(state.summary),
            }
        }

        async fn score_claim(&self, claim_id: &ClaimId) -> Result<ScoringReport, PortError> {
            self.scoring_calls.fetch_add(1, Ordering::SeqCst);
            self.pass_gate(GateKey::Scoring(claim_id.clone())).await;
            let state = self.lock();
            if let Some(failure) = state.scoring_failures.get(claim_id) {
                return Err(failure.to_port_error());
            }
            state
                .scoring
                .get(claim_id)
                .cloned()
                .ok_or_else(|| PortError::rejected(404, Some("Claim not found".to_string()), None))
        }

        async fn submit_decision(&self, claim_id: &ClaimId, request: &ReviewRequest) -> Result<(), PortError> {
            self.pass_gate(GateKey::Decision(claim_id.clone())).await;
            let mut state = self.lock();
            if let Some(failure) = &state.decision_failure {
                return Err(failure.to_port_error());
            }

            let before = state.pending.len();
            state.pending.retain(|c| &c.id != claim_id);
            if state.pending.len() < before {
                state.summary.pending = state.summary.pending.saturating_sub(1);
                match request.decision {
                    Decision::Approved => state.summary.approved += 1,
                    Decision::Rejected => state.summary.rejected += 1,
                }
            }
            if let Some(report) = state.scoring.get_mut(claim_id) {
                if let Some(claim) = report.claim.as_mut() {
                    claim.status = match request.decision {
                        Decision::Approved => ClaimStatus::Approved,
                        Decision::Rejected => ClaimStatus::Rejected,
                    };
                }
            }
            state.submitted.push((claim_id.clone(), request.clone()));
            Ok(())
        }

        async fn fraud_cluster(&self, query: &ClusterQuery) -> Result<ClusterReport, PortError> {
            self.lock()
                .clusters
                .get(query.provider_id())
                .cloned()
                .ok_or_else(|| PortError::rejected(404, Some("Provider not found".to_string()), None))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::mock::{MockClaimsPort, MockFailure, GateKey};
    use crate::decision::Decision;
    use crate::scoring::{FraudLabel, ScoringResult};

    fn claim(id: &str) -> Claim {
        Claim::pending(ClaimId::new(id).unwrap())
    }

    #[tokio::test]
    async fn test_mock_port_lists_pending() {
        let port = MockClaimsPort::with_pending(vec![claim("CLM1"), claim("CLM2")]);
        assert_eq!(port.list_pending().await.unwrap().len(), 2);
        assert_eq!(port.admin_summary().await.unwrap().pending, 2);
        assert_eq!(port.pending_calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_port_failures() {
        let port = MockClaimsPort::new();
        port.fail_pending(Some(MockFailure::server_error(500, "db down")));
        let err = port.list_pending().await.unwrap_err();
        assert_eq!(err.server_error(), Some("db down"));

        let missing = port.score_claim(&ClaimId::new("CLM9").unwrap()).await.unwrap_err();
        assert!(missing.is_not_found());
    }

    #[tokio::test]
    async fn test_mock_port_decision_updates_queue() {
        let port = MockClaimsPort::with_pending(vec![claim("CLM1"), claim("CLM2")]);
        let request = ReviewRequest::new(Decision::Rejected, None);
        port.submit_decision(&ClaimId::new("CLM1").unwrap(), &request).await.unwrap();

        assert_eq!(port.list_pending().await.unwrap().len(), 1);
        let summary = port.admin_summary().await.unwrap();
        assert_eq!((summary.pending, summary.rejected), (1, 1));
        assert_eq!(port.submitted().len(), 1);
    }

    #[tokio::test]
    async fn test_mock_port_gate_holds_response() {
        let port = std::sync::Arc::new(MockClaimsPort::new());
        let id = ClaimId::new("CLM1").unwrap();
        port.set_scoring(id.clone(), crate::scoring::ScoringReport::new(
            ScoringResult::new(FraudLabel::Fraud, Some(0.8), vec![]),
        ));
        let gate = port.hold(GateKey::Scoring(id.clone()));

        let task = {
            let port = port.clone();
            let id = id.clone();
            tokio::spawn(async move { port.score_claim(&id).await })
        };
        tokio::task::yield_now().await;
        assert!(!task.is_finished());

        gate.release();
        let report = task.await.unwrap().unwrap();
        assert_eq!(report.result.label, FraudLabel::Fraud);
    }
}
