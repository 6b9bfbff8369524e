//! Review desk
//!
//! The desk is the single owner of everything the operator sees: the loaded
//! queue, the counters, the search query, the review panel and the page
//! error banner. Network calls run as spawned tasks that report back over a
//! channel; the owner applies their [`DeskEvent`]s one at a time.
//!
//! ```rust,ignore
//! let mut desk = ReviewDesk::new(port);
//! desk.mount();
//! loop {
//!     let event = desk.next_event().await;
//!     let change = desk.apply(event);
//!     render(&desk, &change);
//! }
//! ```

use std::borrow::Cow;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use core_kernel::{ClaimId, PortError};
use crate::claim::Claim;
use crate::cluster::{ClusterQuery, ClusterReport};
use crate::decision::{Decision, DecisionOutcome, DecisionSubmitter, PendingDecision};
use crate::error::{ClaimError, FailureContext};
use crate::filter::filter_claims;
use crate::panel::{PanelController, PanelTicket};
use crate::ports::ClaimsPort;
use crate::queue::{LoadCycle, LoadSettlement, QueueLoader};
use crate::scoring::ScoringReport;
use crate::summary::SummaryCounters;

/// Page-level error banner holding at most one message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorSlot(Option<String>);

impl ErrorSlot {
    pub fn clear(&mut self) {
        self.0 = None;
    }

    /// Records `message` unless a message is already shown
    pub fn record_first(&mut self, message: impl Into<String>) -> bool {
        if self.0.is_some() {
            return false;
        }
        self.0 = Some(message.into());
        true
    }

    pub fn replace(&mut self, message: impl Into<String>) {
        self.0 = Some(message.into());
    }

    pub fn message(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// Result of a spawned network task
#[derive(Debug)]
pub enum DeskEvent {
    PendingSettled {
        cycle: LoadCycle,
        outcome: Result<Vec<Claim>, PortError>,
    },
    SummarySettled {
        cycle: LoadCycle,
        outcome: Result<SummaryCounters, PortError>,
    },
    ScoringSettled {
        ticket: PanelTicket,
        outcome: Result<ScoringReport, PortError>,
    },
    DecisionSettled {
        pending: PendingDecision,
        outcome: Result<(), PortError>,
    },
}

/// What applying an event changed, for the renderer
#[derive(Debug, Clone, PartialEq)]
pub enum DeskChange {
    QueueUpdated,
    SummaryUpdated,
    /// A queue fetch failed; the message is in the error slot if it was first
    LoadFailed(String),
    PanelUpdated,
    DecisionPersisted { claim_id: ClaimId, decision: Decision },
    DecisionFailed(String),
    /// The event belonged to superseded state and was dropped
    Ignored,
}

/// Single-writer owner of the review workflow
pub struct ReviewDesk {
    port: Arc<dyn ClaimsPort>,
    queue: QueueLoader,
    panel: PanelController,
    query: String,
    error: ErrorSlot,
    events_tx: mpsc::UnboundedSender<DeskEvent>,
    events_rx: mpsc::UnboundedReceiver<DeskEvent>,
    in_flight: usize,
}

impl ReviewDesk {
    pub fn new(port: Arc<dyn ClaimsPort>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            port,
            queue: QueueLoader::new(),
            panel: PanelController::new(),
            query: String::new(),
            error: ErrorSlot::default(),
            events_tx,
            events_rx,
            in_flight: 0,
        }
    }

    // ------------------------------------------------------------------
    // Queue
    // ------------------------------------------------------------------

    /// Starts the initial load; later calls do nothing and return false
    pub fn mount(&mut self) -> bool {
        match self.queue.mount() {
            Some(cycle) => {
                self.spawn_load(cycle);
                true
            }
            None => false,
        }
    }

    /// Starts a new load cycle and clears the error banner
    pub fn refresh(&mut self) -> LoadCycle {
        self.error.clear();
        let cycle = self.queue.begin_cycle();
        self.spawn_load(cycle);
        cycle
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Loaded claims matching the current query
    pub fn visible_claims(&self) -> Cow<'_, [Claim]> {
        filter_claims(&self.query, self.queue.claims())
    }

    pub fn claims(&self) -> &[Claim] {
        self.queue.claims()
    }

    pub fn summary(&self) -> SummaryCounters {
        self.queue.summary()
    }

    pub fn is_loading(&self) -> bool {
        self.queue.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.message()
    }

    // ------------------------------------------------------------------
    // Review panel
    // ------------------------------------------------------------------

    pub fn panel(&self) -> &PanelController {
        &self.panel
    }

    /// Opens a review for `claim` and requests its score
    ///
    /// # Errors
    ///
    /// Returns `ClaimError::PanelBusy` while a decision is being submitted.
    pub fn open_review(&mut self, claim: Claim) -> Result<PanelTicket, ClaimError> {
        let ticket = self.panel.open(claim)?;
        self.spawn_scoring(ticket.clone());
        Ok(ticket)
    }

    /// Opens a review for the loaded claim with the given id
    ///
    /// # Errors
    ///
    /// Returns `ClaimError::ClaimNotInQueue` if no loaded claim has that id.
    pub fn open_review_by_id(&mut self, claim_id: &str) -> Result<PanelTicket, ClaimError> {
        let claim_id = ClaimId::new(claim_id)?;
        let claim = self
            .queue
            .claims()
            .iter()
            .find(|c| c.id == claim_id)
            .cloned()
            .ok_or_else(|| ClaimError::ClaimNotInQueue(claim_id.to_string()))?;
        self.open_review(claim)
    }

    /// Closes the panel on explicit request
    pub fn close_review(&mut self) -> Result<bool, ClaimError> {
        self.panel.close()
    }

    /// Cancellation key: closes the panel unless a decision is in flight
    pub fn cancel_key(&mut self) -> bool {
        self.close_quietly("cancellation key")
    }

    /// Interaction outside the panel surface; same rules as the cancellation key
    pub fn dismiss_outside(&mut self) -> bool {
        self.close_quietly("outside interaction")
    }

    pub fn toggle_raw(&mut self) -> Result<bool, ClaimError> {
        self.panel.toggle_raw()
    }

    /// Submits a decision for the open panel
    ///
    /// Returns false and changes nothing when no panel is open, it is busy,
    /// or its scoring has not settled.
    pub fn decide(&mut self, decision: Decision) -> bool {
        match DecisionSubmitter::begin(&mut self.panel, decision) {
            Ok(pending) => {
                self.spawn_decision(pending);
                true
            }
            Err(refusal) => {
                debug!(decision = %decision, reason = %refusal, "Decide ignored");
                false
            }
        }
    }

    /// Looks up the fraud ring around a provider
    ///
    /// # Errors
    ///
    /// Returns the operator-facing message: the service's `error` string or
    /// "Lookup failed".
    pub async fn lookup_cluster(&self, query: &ClusterQuery) -> Result<ClusterReport, String> {
        self.port.fraud_cluster(query).await.map_err(|error| {
            warn!(provider_id = %query.provider_id(), error = %error, "Cluster lookup failed");
            FailureContext::ClusterLookup.describe(&error)
        })
    }

    // ------------------------------------------------------------------
    // Event loop
    // ------------------------------------------------------------------

    /// Number of spawned tasks whose events have not been applied yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight == 0
    }

    /// Waits for the next settled task
    ///
    /// The desk keeps a sender alive, so this only returns `None` if the
    /// channel was closed from elsewhere.
    pub async fn next_event(&mut self) -> Option<DeskEvent> {
        self.events_rx.recv().await
    }

    /// Applies one settled task to the desk state
    pub fn apply(&mut self, event: DeskEvent) -> DeskChange {
        self.in_flight = self.in_flight.saturating_sub(1);

        match event {
            DeskEvent::PendingSettled { cycle, outcome } => {
                let settlement = self.queue.apply_pending(cycle, outcome);
                self.settle_load(settlement, DeskChange::QueueUpdated)
            }
            DeskEvent::SummarySettled { cycle, outcome } => {
                let settlement = self.queue.apply_summary(cycle, outcome);
                self.settle_load(settlement, DeskChange::SummaryUpdated)
            }
            DeskEvent::ScoringSettled { ticket, outcome } => {
                if self.panel.apply_scoring(&ticket, outcome) {
                    DeskChange::PanelUpdated
                } else {
                    DeskChange::Ignored
                }
            }
            DeskEvent::DecisionSettled { pending, outcome } => {
                match DecisionSubmitter::settle(&mut self.panel, &pending, outcome) {
                    DecisionOutcome::Persisted { claim_id, decision } => {
                        self.queue.forget_claim(&claim_id);
                        self.refresh();
                        DeskChange::DecisionPersisted { claim_id, decision }
                    }
                    DecisionOutcome::Failed { message } => {
                        self.error.replace(message.clone());
                        DeskChange::DecisionFailed(message)
                    }
                    DecisionOutcome::Stale => DeskChange::Ignored,
                }
            }
        }
    }

    /// Applies events until no spawned task is outstanding
    pub async fn run_until_idle(&mut self) -> Vec<DeskChange> {
        let mut changes = Vec::new();
        while self.in_flight > 0 {
            match self.next_event().await {
                Some(event) => changes.push(self.apply(event)),
                None => break,
            }
        }
        changes
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn settle_load(&mut self, settlement: LoadSettlement, applied: DeskChange) -> DeskChange {
        match settlement {
            LoadSettlement::Applied => applied,
            LoadSettlement::Failed(message) => {
                self.error.record_first(message.clone());
                DeskChange::LoadFailed(message)
            }
            LoadSettlement::Stale => DeskChange::Ignored,
        }
    }

    fn close_quietly(&mut self, trigger: &'static str) -> bool {
        match self.panel.close() {
            Ok(closed) => closed,
            Err(refusal) => {
                debug!(trigger, reason = %refusal, "Panel kept open");
                false
            }
        }
    }

    fn spawn_load(&mut self, cycle: LoadCycle) {
        info!(cycle = cycle.number(), "Loading review queue");
        self.in_flight += 2;

        let port = Arc::clone(&self.port);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let outcome = port.list_pending().await;
            let _ = tx.send(DeskEvent::PendingSettled { cycle, outcome });
        });

        let port = Arc::clone(&self.port);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let outcome = port.admin_summary().await;
            let _ = tx.send(DeskEvent::SummarySettled { cycle, outcome });
        });
    }

    fn spawn_scoring(&mut self, ticket: PanelTicket) {
        self.in_flight += 1;
        let port = Arc::clone(&self.port);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let outcome = port.score_claim(ticket.claim_id()).await;
            let _ = tx.send(DeskEvent::ScoringSettled { ticket, outcome });
        });
    }

    fn spawn_decision(&mut self, pending: PendingDecision) {
        self.in_flight += 1;
        let port = Arc::clone(&self.port);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let outcome = port.submit_decision(pending.claim_id(), &pending.request).await;
            let _ = tx.send(DeskEvent::DecisionSettled { pending, outcome });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_slot_first_wins() {
        let mut slot = ErrorSlot::default();
        assert!(slot.record_first("Failed to load pending claims"));
        assert!(!slot.record_first("Failed to load admin summary"));
        assert_eq!(slot.message(), Some("Failed to load pending claims"));

        slot.replace("Failed to persist decision");
        assert_eq!(slot.message(), Some("Failed to persist decision"));

        slot.clear();
        assert_eq!(slot.message(), None);
    }
}
