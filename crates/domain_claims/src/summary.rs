//! Admin summary counters

use serde::{Deserialize, Serialize};

/// Claim counts recomputed by the remote service
///
/// The desk only ever displays the latest snapshot it fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryCounters {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub pending: u64,
    #[serde(default)]
    pub approved: u64,
    #[serde(default)]
    pub rejected: u64,
}

/// Body of the admin summary endpoint: `{ overall: { ... } }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminSummary {
    #[serde(default)]
    pub overall: SummaryCounters,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_counts_read_as_zero() {
        let summary: AdminSummary =
            serde_json::from_str(r#"{"overall":{"total":12,"pending":4}}"#).unwrap();
        assert_eq!(
            summary.overall,
            SummaryCounters { total: 12, pending: 4, approved: 0, rejected: 0 }
        );

        let empty: AdminSummary = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.overall, SummaryCounters::default());
    }
}
