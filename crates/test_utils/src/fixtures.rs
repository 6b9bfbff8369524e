//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the review desk. The values mirror
//! what the remote claims service returns so tests read like real sessions.

use chrono::NaiveDate;
use core_kernel::{ClaimId, ProviderId};
use domain_claims::{
    Claim, ClaimStatus, ClusterReport, FeatureContribution, FeatureValue, FraudLabel,
    ScoringReport, ScoringResult, SummaryCounters, SuspiciousLink,
};
use rust_decimal_macros::dec;
use serde_json::json;

/// Fixture for identifier test data
pub struct IdFixtures;

impl IdFixtures {
    pub fn claim_id(raw: &str) -> ClaimId {
        ClaimId::new(raw).unwrap()
    }

    pub fn provider_id(raw: &str) -> ProviderId {
        ProviderId::new(raw).unwrap()
    }

    /// Claim under review in most scenarios
    pub fn claim_a() -> ClaimId {
        Self::claim_id("CLM46116")
    }

    /// Second claim, for panel replacement scenarios
    pub fn claim_b() -> ClaimId {
        Self::claim_id("CLM52019")
    }
}

/// Fixture for claim records
pub struct ClaimFixtures;

impl ClaimFixtures {
    /// Inpatient claim with every field populated
    pub fn inpatient() -> Claim {
        Claim {
            id: IdFixtures::claim_a(),
            provider_id: Some(IdFixtures::provider_id("PRV51001")),
            start_date: NaiveDate::from_ymd_opt(2009, 4, 12),
            amount_reimbursed: Some(dec!(26000)),
            diagnosis_group_code: Some("201".to_string()),
            status: ClaimStatus::Pending,
        }
    }

    /// Outpatient claim from a different provider
    pub fn outpatient() -> Claim {
        Claim {
            id: IdFixtures::claim_b(),
            provider_id: Some(IdFixtures::provider_id("PRV55912")),
            start_date: NaiveDate::from_ymd_opt(2009, 8, 31),
            amount_reimbursed: Some(dec!(50)),
            diagnosis_group_code: Some("750".to_string()),
            status: ClaimStatus::Pending,
        }
    }

    /// Claim with only its identifier
    pub fn bare(raw_id: &str) -> Claim {
        Claim::pending(IdFixtures::claim_id(raw_id))
    }

    /// A small queue covering distinct providers and codes
    pub fn queue() -> Vec<Claim> {
        vec![
            Self::inpatient(),
            Self::outpatient(),
            Claim {
                id: IdFixtures::claim_id("CLM66048"),
                provider_id: Some(IdFixtures::provider_id("PRV51001")),
                start_date: NaiveDate::from_ymd_opt(2009, 9, 17),
                amount_reimbursed: Some(dec!(5000)),
                diagnosis_group_code: Some("882".to_string()),
                status: ClaimStatus::Pending,
            },
        ]
    }
}

/// Fixture for scoring responses
pub struct ScoringFixtures;

impl ScoringFixtures {
    /// High-risk score with ranked contributions
    pub fn fraud(probability: f64) -> ScoringResult {
        ScoringResult::new(
            FraudLabel::Fraud,
            Some(probability),
            vec![
                FeatureContribution {
                    name: "InscClaimAmtReimbursed".to_string(),
                    value: FeatureValue::Number(26000.0),
                    impact: 0.41,
                },
                FeatureContribution {
                    name: "DiagnosisGroupCode".to_string(),
                    value: FeatureValue::Category("201".to_string()),
                    impact: 0.12,
                },
            ],
        )
        .with_explanation(Some("Reimbursement far above the provider median.".to_string()))
        .with_raw(Some(json!({ "prediction": 1, "probability": probability })))
        .with_payload_sent(Some(json!({ "InscClaimAmtReimbursed": 26000 })))
    }

    pub fn not_fraud(probability: f64) -> ScoringResult {
        ScoringResult::new(FraudLabel::NotFraud, Some(probability), Vec::new())
    }

    /// Report for `claim`, carrying the claim back as the service does
    pub fn report_for(claim: &Claim, result: ScoringResult) -> ScoringReport {
        ScoringReport::new(result).with_claim(claim.clone())
    }
}

/// Fixture for summary counters
pub struct SummaryFixtures;

impl SummaryFixtures {
    pub fn busy_day() -> SummaryCounters {
        SummaryCounters { total: 120, pending: 3, approved: 90, rejected: 27 }
    }
}

/// Fixture for cluster lookups
pub struct ClusterFixtures;

impl ClusterFixtures {
    pub fn ring(provider: &str) -> ClusterReport {
        let member = IdFixtures::provider_id("PRV55912");
        ClusterReport {
            provider_id: IdFixtures::provider_id(provider),
            in_ring: true,
            cluster_size: 2,
            providers_in_cluster: vec![IdFixtures::provider_id(provider), member.clone()],
            suspicious_links: vec![SuspiciousLink {
                provider1: IdFixtures::provider_id(provider),
                provider2: member,
                shared_count: 14,
            }],
            reason: None,
        }
    }
}
