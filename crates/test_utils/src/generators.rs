//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use core_kernel::{ClaimId, ProviderId};
use domain_claims::{Claim, ClaimStatus};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for generating claim identifiers in the service's format
pub fn claim_id_strategy() -> impl Strategy<Value = ClaimId> {
    (1u32..999_999u32).prop_map(|n| ClaimId::new(format!("CLM{n}")).unwrap())
}

/// Strategy for generating provider identifiers
pub fn provider_id_strategy() -> impl Strategy<Value = ProviderId> {
    (50_000u32..60_000u32).prop_map(|n| ProviderId::new(format!("PRV{n}")).unwrap())
}

/// Strategy for generating diagnosis group codes, sometimes alphanumeric
pub fn diagnosis_code_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (1u32..999u32).prop_map(|n| format!("{n:03}")),
        "[A-Za-z]{1,2}[0-9]{1,3}",
    ]
}

/// Strategy for generating claim statuses
pub fn claim_status_strategy() -> impl Strategy<Value = ClaimStatus> {
    prop_oneof![
        Just(ClaimStatus::Pending),
        Just(ClaimStatus::Approved),
        Just(ClaimStatus::Rejected),
    ]
}

/// Strategy for generating claims with optional fields left out at random
pub fn claim_strategy() -> impl Strategy<Value = Claim> {
    (
        claim_id_strategy(),
        proptest::option::of(provider_id_strategy()),
        proptest::option::of(diagnosis_code_strategy()),
        proptest::option::of(0i64..10_000_000i64),
        claim_status_strategy(),
    )
        .prop_map(|(id, provider_id, code, cents, status)| Claim {
            id,
            provider_id,
            start_date: None,
            amount_reimbursed: cents.map(|c| Decimal::new(c, 2)),
            diagnosis_group_code: code,
            status,
        })
}

/// Strategy for generating a loaded queue
pub fn claims_strategy() -> impl Strategy<Value = Vec<Claim>> {
    proptest::collection::vec(claim_strategy(), 0..40)
}

/// Strategy for generating search text an operator might type
pub fn query_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        " {0,3}",
        "[cCpP][lLrR][mMvV][0-9]{0,3}",
        "[0-9]{1,3}",
        " ?[A-Za-z0-9]{1,4} ?",
    ]
}
