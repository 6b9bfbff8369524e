//! Claims review errors

use thiserror::Error;

use core_kernel::{IdentifierError, PortError};

/// Errors that can occur in the claims review domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Claim not in the review queue: {0}")]
    ClaimNotInQueue(String),

    #[error("Review panel is busy submitting a decision")]
    PanelBusy,

    #[error("No review panel is open")]
    PanelClosed,

    #[error("Raw response is only available once scoring has completed")]
    RawUnavailable,

    #[error("Decision not allowed: {0}")]
    DecisionNotAllowed(&'static str),

    #[error("{0}")]
    InvalidClusterQuery(String),

    #[error(transparent)]
    Identifier(#[from] IdentifierError),
}

/// Operation whose failure is being reported to the operator
///
/// Each context turns a [`PortError`] into a banner message: the most
/// specific string the service provided, otherwise a generic message naming
/// the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureContext {
    PendingClaims,
    AdminSummary,
    Scoring,
    Decision,
    ClusterLookup,
}

impl FailureContext {
    pub fn fallback(&self) -> &'static str {
        match self {
            FailureContext::PendingClaims => "Failed to load pending claims",
            FailureContext::AdminSummary => "Failed to load admin summary",
            FailureContext::Scoring => "Scoring failed",
            FailureContext::Decision => "Failed to persist decision",
            FailureContext::ClusterLookup => "Lookup failed",
        }
    }

    /// Message shown for `error`
    ///
    /// Scoring failures also consider the service's `detail` string.
    pub fn describe(&self, error: &PortError) -> String {
        let specific = match self {
            FailureContext::Scoring => error.server_error().or_else(|| error.server_detail()),
            _ => error.server_error(),
        };
        specific
            .map(str::to_string)
            .unwrap_or_else(|| self.fallback().to_string())
    }
}
