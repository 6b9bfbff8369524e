//! Pending queue loading
//!
//! A load cycle fetches the pending list and the admin summary side by side.
//! Each half settles on its own: a failed list empties the queue, a failed
//! summary keeps the last counters. Results from a superseded cycle are
//! dropped.

use tracing::{debug, info, warn};

use core_kernel::{ClaimId, PortError};
use crate::claim::Claim;
use crate::error::FailureContext;
use crate::summary::SummaryCounters;

/// Identifies one invocation of the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadCycle(u64);

impl LoadCycle {
    pub fn number(&self) -> u64 {
        self.0
    }
}

/// What happened to one half of a load cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadSettlement {
    Applied,
    /// The fetch failed; carries the operator-facing message
    Failed(String),
    /// The result belonged to an older cycle and was dropped
    Stale,
}

impl LoadSettlement {
    pub fn failure(&self) -> Option<&str> {
        match self {
            LoadSettlement::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Cached queue and counters for the current load cycle
#[derive(Debug, Default)]
pub struct QueueLoader {
    mounted: bool,
    cycle: u64,
    claims: Vec<Claim>,
    summary: SummaryCounters,
    pending_outstanding: bool,
    summary_outstanding: bool,
}

impl QueueLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the initial load
    ///
    /// Returns `None` on every call after the first.
    pub fn mount(&mut self) -> Option<LoadCycle> {
        if self.mounted {
            debug!("Queue already mounted; ignoring duplicate initial load");
            return None;
        }
        self.mounted = true;
        Some(self.begin_cycle())
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Starts a new load cycle, superseding any outstanding one
    pub fn begin_cycle(&mut self) -> LoadCycle {
        self.cycle += 1;
        self.pending_outstanding = true;
        self.summary_outstanding = true;
        debug!(cycle = self.cycle, "Load cycle started");
        LoadCycle(self.cycle)
    }

    pub fn current_cycle(&self) -> Option<LoadCycle> {
        (self.cycle > 0).then_some(LoadCycle(self.cycle))
    }

    /// True while either half of the current cycle is outstanding
    pub fn is_loading(&self) -> bool {
        self.pending_outstanding || self.summary_outstanding
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    pub fn summary(&self) -> SummaryCounters {
        self.summary
    }

    /// Settles the pending-list half of `cycle`
    pub fn apply_pending(&mut self, cycle: LoadCycle, outcome: Result<Vec<Claim>, PortError>) -> LoadSettlement {
        if cycle.0 != self.cycle || !self.pending_outstanding {
            debug!(cycle = cycle.0, current = self.cycle, "Dropping pending list from a superseded cycle");
            return LoadSettlement::Stale;
        }
        self.pending_outstanding = false;

        match outcome {
            Ok(claims) => {
                info!(cycle = cycle.0, count = claims.len(), "Pending claims loaded");
                self.claims = claims;
                LoadSettlement::Applied
            }
            Err(error) => {
                warn!(cycle = cycle.0, error = %error, "Failed to load pending claims");
                self.claims = Vec::new();
                LoadSettlement::Failed(FailureContext::PendingClaims.describe(&error))
            }
        }
    }

    /// Settles the summary half of `cycle`
    pub fn apply_summary(&mut self, cycle: LoadCycle, outcome: Result<SummaryCounters, PortError>) -> LoadSettlement {
        if cycle.0 != self.cycle || !self.summary_outstanding {
            debug!(cycle = cycle.0, current = self.cycle, "Dropping summary from a superseded cycle");
            return LoadSettlement::Stale;
        }
        self.summary_outstanding = false;

        match outcome {
            Ok(summary) => {
                debug!(cycle = cycle.0, pending = summary.pending, total = summary.total, "Admin summary loaded");
                self.summary = summary;
                LoadSettlement::Applied
            }
            Err(error) => {
                warn!(cycle = cycle.0, error = %error, "Failed to load admin summary");
                LoadSettlement::Failed(FailureContext::AdminSummary.describe(&error))
            }
        }
    }

    pub(crate) fn forget_claim(&mut self, claim_id: &ClaimId) {
        self.claims.retain(|c| &c.id != claim_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(id: &str) -> Claim {
        Claim::pending(ClaimId::new(id).unwrap())
    }

    #[test]
    fn test_mount_is_one_shot() {
        let mut loader = QueueLoader::new();
        assert!(loader.mount().is_some());
        assert!(loader.mount().is_none());
        assert!(loader.is_mounted());
    }

    #[test]
    fn test_superseded_cycle_dropped() {
        let mut loader = QueueLoader::new();
        let first = loader.begin_cycle();
        let second = loader.begin_cycle();

        assert_eq!(loader.apply_pending(first, Ok(vec![claim("OLD")])), LoadSettlement::Stale);
        assert!(loader.claims().is_empty());

        assert_eq!(loader.apply_pending(second, Ok(vec![claim("NEW")])), LoadSettlement::Applied);
        assert_eq!(loader.claims()[0].id.as_str(), "NEW");
        assert!(loader.is_loading());
    }

    #[test]
    fn test_failed_summary_keeps_last_counters() {
        let mut loader = QueueLoader::new();
        let cycle = loader.begin_cycle();
        let counters = SummaryCounters { total: 5, pending: 2, approved: 2, rejected: 1 };
        loader.apply_summary(cycle, Ok(counters));

        let cycle = loader.begin_cycle();
        let settlement = loader.apply_summary(cycle, Err(PortError::connection("reset")));
        assert_eq!(settlement.failure(), Some("Failed to load admin summary"));
        assert_eq!(loader.summary(), counters);
    }

    #[test]
    fn test_failed_list_empties_queue() {
        let mut loader = QueueLoader::new();
        let cycle = loader.begin_cycle();
        loader.apply_pending(cycle, Ok(vec![claim("CLM1")]));

        let cycle = loader.begin_cycle();
        let settlement = loader.apply_pending(
            cycle,
            Err(PortError::rejected(500, Some("database unavailable".into()), None)),
        );
        assert_eq!(settlement.failure(), Some("database unavailable"));
        assert!(loader.claims().is_empty());
    }

    #[test]
    fn test_cycle_tolerates_both_failures() {
        let mut loader = QueueLoader::new();
        let cycle = loader.begin_cycle();

        let pending = loader.apply_pending(cycle, Err(PortError::connection("reset")));
        let summary = loader.apply_summary(
            cycle,
            Err(PortError::rejected(503, Some("maintenance".into()), None)),
        );
        assert_eq!(pending.failure(), Some("Failed to load pending claims"));
        assert_eq!(summary.failure(), Some("maintenance"));
        assert!(!loader.is_loading());
    }
}
