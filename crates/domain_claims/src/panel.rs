//! Review panel state machine
//!
//! At most one review panel exists at a time. Its lifecycle:
//!
//! ```text
//!            open(claim)
//! Closed ───────────────▶ ScoringInFlight ──ok──▶ Scored ─────┐
//!   ▲                            │                             │ decide
//!   │                            └──err──▶ ScoringFailed ──────┤
//!   │ close / decision persisted                               ▼
//!   └──────────────────────────────────────────────────── (Busy overlay)
//! ```
//!
//! Every open hands out a [`PanelTicket`]. Responses are applied only when
//! their ticket still names the current panel, so a late scoring response for
//! a panel that was closed or replaced is dropped.

use tracing::{debug, info, warn};

use core_kernel::{ClaimId, PortError};
use crate::claim::Claim;
use crate::error::{ClaimError, FailureContext};
use crate::scoring::{ScoringReport, ScoringResult};

/// Correlates a request with the panel that issued it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PanelTicket {
    claim_id: ClaimId,
    generation: u64,
}

impl PanelTicket {
    pub fn claim_id(&self) -> &ClaimId {
        &self.claim_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Where the panel's scoring request stands
#[derive(Debug, Clone, PartialEq)]
pub enum ScoringStage {
    InFlight,
    Scored(ScoringResult),
    Failed { message: String },
}

/// Coarse panel state, for rendering and assertions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelPhase {
    Closed,
    ScoringInFlight,
    Scored,
    ScoringFailed,
}

/// The claim currently under review
#[derive(Debug, Clone)]
pub struct ReviewPanel {
    ticket: PanelTicket,
    claim: Claim,
    scoring: ScoringStage,
    busy: bool,
    show_raw: bool,
}

impl ReviewPanel {
    pub fn ticket(&self) -> &PanelTicket {
        &self.ticket
    }

    pub fn claim(&self) -> &Claim {
        &self.claim
    }

    pub fn scoring(&self) -> &ScoringStage {
        &self.scoring
    }

    /// The scoring result, once scoring succeeded
    pub fn scoring_result(&self) -> Option<&ScoringResult> {
        match &self.scoring {
            ScoringStage::Scored(result) => Some(result),
            _ => None,
        }
    }

    /// True while a decision for this panel is being submitted
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn shows_raw(&self) -> bool {
        self.show_raw
    }

    pub fn phase(&self) -> PanelPhase {
        match self.scoring {
            ScoringStage::InFlight => PanelPhase::ScoringInFlight,
            ScoringStage::Scored(_) => PanelPhase::Scored,
            ScoringStage::Failed { .. } => PanelPhase::ScoringFailed,
        }
    }
}

/// Owner of the singleton review panel
#[derive(Debug, Default)]
pub struct PanelController {
    panel: Option<ReviewPanel>,
    generation: u64,
}

impl PanelController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&ReviewPanel> {
        self.panel.as_ref()
    }

    pub fn phase(&self) -> PanelPhase {
        self.panel.as_ref().map_or(PanelPhase::Closed, ReviewPanel::phase)
    }

    pub fn is_open(&self) -> bool {
        self.panel.is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.panel.as_ref().is_some_and(ReviewPanel::is_busy)
    }

    /// Opens a panel for `claim`, discarding any panel that was open
    ///
    /// The panel shows the claim immediately with scoring in flight. The
    /// returned ticket must accompany the scoring request.
    ///
    /// # Errors
    ///
    /// Returns `ClaimError::PanelBusy` while a decision is being submitted.
    pub fn open(&mut self, claim: Claim) -> Result<PanelTicket, ClaimError> {
        if self.is_busy() {
            return Err(ClaimError::PanelBusy);
        }
        if let Some(previous) = self.panel.take() {
            debug!(claim_id = %previous.claim.id, generation = previous.ticket.generation, "Discarding previous review panel");
        }

        self.generation += 1;
        let ticket = PanelTicket {
            claim_id: claim.id.clone(),
            generation: self.generation,
        };
        info!(claim_id = %claim.id, generation = self.generation, "Review panel opened");

        self.panel = Some(ReviewPanel {
            ticket: ticket.clone(),
            claim,
            scoring: ScoringStage::InFlight,
            busy: false,
            show_raw: false,
        });
        Ok(ticket)
    }

    /// Applies the outcome of the scoring request issued with `ticket`
    ///
    /// Returns false, leaving the panel untouched, when the ticket no longer
    /// names the current panel or the panel already settled its scoring.
    pub fn apply_scoring(&mut self, ticket: &PanelTicket, outcome: Result<ScoringReport, PortError>) -> bool {
        let Some(panel) = self.panel_for(ticket) else {
            debug!(claim_id = %ticket.claim_id, generation = ticket.generation, "Ignoring scoring response for a stale panel");
            return false;
        };
        if panel.scoring != ScoringStage::InFlight {
            warn!(claim_id = %ticket.claim_id, "Ignoring duplicate scoring response");
            return false;
        }

        match outcome {
            Ok(report) => {
                if let Some(claim) = report.claim {
                    if claim.id == panel.claim.id {
                        panel.claim = claim;
                    } else {
                        warn!(
                            selected = %panel.claim.id,
                            returned = %claim.id,
                            "Scoring response carried a different claim; keeping the selected one"
                        );
                    }
                }
                info!(
                    claim_id = %panel.claim.id,
                    label = %report.result.label,
                    probability = ?report.result.probability,
                    "Claim scored"
                );
                panel.scoring = ScoringStage::Scored(report.result);
            }
            Err(error) => {
                let message = FailureContext::Scoring.describe(&error);
                warn!(claim_id = %panel.claim.id, error = %error, "Scoring failed");
                panel.scoring = ScoringStage::Failed { message };
            }
        }
        true
    }

    /// Closes the panel, discarding its state
    ///
    /// Returns `Ok(false)` if no panel was open.
    ///
    /// # Errors
    ///
    /// Returns `ClaimError::PanelBusy` while a decision is being submitted.
    pub fn close(&mut self) -> Result<bool, ClaimError> {
        if self.is_busy() {
            return Err(ClaimError::PanelBusy);
        }
        match self.panel.take() {
            Some(panel) => {
                info!(claim_id = %panel.claim.id, "Review panel closed");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Flips the raw-response visibility flag, returning the new value
    ///
    /// # Errors
    ///
    /// Returns `ClaimError::PanelClosed` without a panel and
    /// `ClaimError::RawUnavailable` unless scoring succeeded.
    pub fn toggle_raw(&mut self) -> Result<bool, ClaimError> {
        let panel = self.panel.as_mut().ok_or(ClaimError::PanelClosed)?;
        if panel.phase() != PanelPhase::Scored {
            return Err(ClaimError::RawUnavailable);
        }
        panel.show_raw = !panel.show_raw;
        Ok(panel.show_raw)
    }

    pub(crate) fn panel_for(&mut self, ticket: &PanelTicket) -> Option<&mut ReviewPanel> {
        self.panel.as_mut().filter(|p| &p.ticket == ticket)
    }

    pub(crate) fn current_mut(&mut self) -> Option<&mut ReviewPanel> {
        self.panel.as_mut()
    }

    pub(crate) fn discard(&mut self, ticket: &PanelTicket) -> bool {
        if self.panel.as_ref().is_some_and(|p| &p.ticket == ticket) {
            self.panel = None;
            true
        } else {
            false
        }
    }
}

impl ReviewPanel {
    pub(crate) fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }
}
