//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for desk state that give
//! more meaningful error messages than standard assertions.

use domain_claims::{Claim, PanelPhase, ReviewDesk};

/// Asserts the desk's panel is in `expected`
pub fn assert_panel_phase(desk: &ReviewDesk, expected: PanelPhase) {
    let actual = desk.panel().phase();
    assert_eq!(
        actual,
        expected,
        "Panel phase mismatch: actual={:?}, expected={:?}, claim={:?}",
        actual,
        expected,
        desk.panel().current().map(|p| p.claim().id.to_string())
    );
}

/// Asserts the error banner shows exactly `expected`
pub fn assert_banner(desk: &ReviewDesk, expected: &str) {
    assert_eq!(
        desk.error(),
        Some(expected),
        "Expected error banner {:?}, got {:?}",
        expected,
        desk.error()
    );
}

/// Asserts the error banner is empty
pub fn assert_no_banner(desk: &ReviewDesk) {
    assert!(desk.error().is_none(), "Expected no error banner, got {:?}", desk.error());
}

/// Asserts every claim in `filtered` matches `query` and no claim of
/// `source` that matches was left out
pub fn assert_filter_exact(query: &str, source: &[Claim], filtered: &[Claim]) {
    let needle = query.trim().to_lowercase();
    let matches = |claim: &Claim| {
        let fields = [
            Some(claim.id.to_string()),
            claim.provider_id.as_ref().map(|p| p.to_string()),
            claim.diagnosis_group_code.clone(),
        ];
        fields
            .iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    };
    for claim in filtered {
        assert!(
            needle.is_empty() || matches(claim),
            "Claim {} returned for query {:?} but does not match",
            claim.id,
            query
        );
    }
    let expected = source.iter().filter(|c| needle.is_empty() || matches(c)).count();
    assert_eq!(
        filtered.len(),
        expected,
        "Query {:?} returned {} claims, expected {}",
        query,
        filtered.len(),
        expected
    );
}
