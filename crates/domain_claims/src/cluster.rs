//! Provider fraud-ring lookup
//!
//! The remote service links providers that share beneficiaries within a
//! time window. This module validates the lookup and models its report.

use serde::{Deserialize, Serialize};

use core_kernel::ProviderId;
use crate::error::ClaimError;

/// Window used when the operator does not give one
pub const DEFAULT_DAYS_WINDOW: u32 = 30;
/// Largest window the service accepts
pub const MAX_DAYS_WINDOW: u32 = 365;

/// A validated cluster lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterQuery {
    provider_id: ProviderId,
    days_window: u32,
}

impl ClusterQuery {
    /// Validates operator input
    ///
    /// # Errors
    ///
    /// Returns `ClaimError::InvalidClusterQuery` if the provider id is blank
    /// or the window is outside `1..=365` days.
    pub fn new(provider: &str, days_window: Option<u32>) -> Result<Self, ClaimError> {
        let provider_id = ProviderId::new(provider)
            .map_err(|_| ClaimError::InvalidClusterQuery("Please enter a Provider ID.".to_string()))?;
        let days_window = days_window.unwrap_or(DEFAULT_DAYS_WINDOW);
        if !(1..=MAX_DAYS_WINDOW).contains(&days_window) {
            return Err(ClaimError::InvalidClusterQuery(format!(
                "Days window must be between 1 and {MAX_DAYS_WINDOW}."
            )));
        }
        Ok(Self { provider_id, days_window })
    }

    pub fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }

    pub fn days_window(&self) -> u32 {
        self.days_window
    }
}

/// Two providers sharing beneficiaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuspiciousLink {
    pub provider1: ProviderId,
    pub provider2: ProviderId,
    #[serde(default)]
    pub shared_count: u32,
}

/// Result of a cluster lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterReport {
    pub provider_id: ProviderId,
    #[serde(default)]
    pub in_ring: bool,
    #[serde(default)]
    pub cluster_size: u32,
    #[serde(default)]
    pub providers_in_cluster: Vec<ProviderId>,
    #[serde(default)]
    pub suspicious_links: Vec<SuspiciousLink>,
    /// Why no ring was found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
