//! Free-text filtering of the review queue

use std::borrow::Cow;

use crate::claim::Claim;

/// Normalised search query
///
/// The query is trimmed and case-folded once; an empty query matches
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimQuery {
    folded: String,
}

impl ClaimQuery {
    pub fn new(text: &str) -> Self {
        Self {
            folded: text.trim().to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.folded.is_empty()
    }

    /// True when the claim id, provider id or diagnosis group code contains
    /// the query, ignoring case
    pub fn matches(&self, claim: &Claim) -> bool {
        self.is_empty()
            || claim
                .searchable_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&self.folded))
    }
}

/// Filters `claims` by a free-text query
///
/// An empty (or all-whitespace) query borrows the input slice back unchanged,
/// so callers can skip redrawing when nothing was filtered out.
pub fn filter_claims<'a>(query: &str, claims: &'a [Claim]) -> Cow<'a, [Claim]> {
    let query = ClaimQuery::new(query);
    if query.is_empty() {
        return Cow::Borrowed(claims);
    }
    Cow::Owned(claims.iter().filter(|c| query.matches(c)).cloned().collect())
}
