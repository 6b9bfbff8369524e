//! Operator decisions on a reviewed claim

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use core_kernel::{ClaimId, PortError};
use crate::error::{ClaimError, FailureContext};
use crate::panel::{PanelController, PanelPhase, PanelTicket};
use crate::scoring::ScoringResult;

/// Operator verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    Approved,
    Rejected,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Approved => f.write_str("Approved"),
            Decision::Rejected => f.write_str("Rejected"),
        }
    }
}

/// Body of the review endpoint
///
/// The scoring evidence is attached only when present: a probability that is
/// absent or exactly zero is left out, as is a missing label. The label goes
/// back in the scorer's own spelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub decision: Decision,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ReviewRequest {
    pub fn new(decision: Decision, evidence: Option<&ScoringResult>) -> Self {
        Self {
            decision,
            score: evidence.and_then(|r| r.probability).filter(|p| *p != 0.0),
            label: evidence.and_then(ScoringResult::evidence_label),
        }
    }
}

/// A decision that has been handed to the port and not yet settled
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDecision {
    pub ticket: PanelTicket,
    pub request: ReviewRequest,
}

impl PendingDecision {
    pub fn claim_id(&self) -> &ClaimId {
        self.ticket.claim_id()
    }
}

/// How a submitted decision ended
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionOutcome {
    /// The service stored the decision and the panel was discarded
    Persisted { claim_id: ClaimId, decision: Decision },
    /// The service refused or could not be reached; the panel stays open
    Failed { message: String },
    /// The decision belonged to a panel that no longer exists
    Stale,
}

/// Gatekeeper for the decide action
pub struct DecisionSubmitter;

impl DecisionSubmitter {
    /// Marks the open panel busy and builds the request to submit
    ///
    /// # Errors
    ///
    /// Fails without touching the panel when none is open, it is already
    /// busy, or its scoring has not settled yet.
    pub fn begin(panel: &mut PanelController, decision: Decision) -> Result<PendingDecision, ClaimError> {
        let phase = panel.phase();
        let current = panel
            .current_mut()
            .ok_or(ClaimError::DecisionNotAllowed("no review panel is open"))?;
        if current.is_busy() {
            return Err(ClaimError::DecisionNotAllowed("a decision is already being submitted"));
        }
        if phase == PanelPhase::ScoringInFlight {
            return Err(ClaimError::DecisionNotAllowed("scoring has not finished"));
        }

        let request = ReviewRequest::new(decision, current.scoring_result());
        current.set_busy(true);
        info!(
            claim_id = %current.claim().id,
            decision = %decision,
            score = ?request.score,
            "Submitting decision"
        );
        Ok(PendingDecision {
            ticket: current.ticket().clone(),
            request,
        })
    }

    /// Applies the service's answer to a submitted decision
    ///
    /// Success discards the panel. Failure clears the busy flag so the
    /// operator can retry or close, and returns the message for the page.
    pub fn settle(
        panel: &mut PanelController,
        pending: &PendingDecision,
        outcome: Result<(), PortError>,
    ) -> DecisionOutcome {
        match outcome {
            Ok(()) => {
                if !panel.discard(&pending.ticket) {
                    warn!(claim_id = %pending.claim_id(), "Decision persisted for a panel that is gone");
                }
                info!(claim_id = %pending.claim_id(), decision = %pending.request.decision, "Decision persisted");
                DecisionOutcome::Persisted {
                    claim_id: pending.claim_id().clone(),
                    decision: pending.request.decision,
                }
            }
            Err(error) => {
                let message = FailureContext::Decision.describe(&error);
                warn!(claim_id = %pending.claim_id(), error = %error, "Decision failed");
                match panel.panel_for(&pending.ticket) {
                    Some(current) => {
                        current.set_busy(false);
                        DecisionOutcome::Failed { message }
                    }
                    None => DecisionOutcome::Stale,
                }
            }
        }
    }
}
