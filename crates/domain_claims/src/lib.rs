//! Claims Review Domain
//!
//! This crate implements the operator review workflow for pending claims:
//! loading the queue, filtering it, reviewing one claim with its fraud score,
//! and persisting an approve/reject decision.
//!
//! # Review Lifecycle
//!
//! ```text
//! Queue loaded -> Panel open (scoring) -> Scored | Scoring failed -> Decide -> Queue reloaded
//! ```
//!
//! The remote claims service is reached only through [`ClaimsPort`]; the
//! [`ReviewDesk`] owns all state and applies network results as events.

pub mod claim;
pub mod summary;
pub mod scoring;
pub mod filter;
pub mod cluster;
pub mod panel;
pub mod decision;
pub mod queue;
pub mod ports;
pub mod desk;
pub mod error;

pub use claim::{Claim, ClaimStatus};
pub use summary::{AdminSummary, SummaryCounters};
pub use scoring::{FeatureContribution, FeatureValue, FraudLabel, ScoringReport, ScoringResult};
pub use filter::{filter_claims, ClaimQuery};
pub use cluster::{ClusterQuery, ClusterReport, SuspiciousLink};
pub use panel::{PanelController, PanelPhase, PanelTicket, ReviewPanel, ScoringStage};
pub use decision::{Decision, DecisionOutcome, DecisionSubmitter, PendingDecision, ReviewRequest};
pub use queue::{LoadCycle, LoadSettlement, QueueLoader};
pub use ports::ClaimsPort;
pub use desk::{DeskChange, DeskEvent, ErrorSlot, ReviewDesk};
pub use error::{ClaimError, FailureContext};
