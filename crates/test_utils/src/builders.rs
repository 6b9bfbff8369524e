//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use chrono::NaiveDate;
use core_kernel::{ClaimId, ProviderId};
use domain_claims::{Claim, ClaimStatus, FeatureContribution, FeatureValue, FraudLabel, ScoringResult};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::fixtures::{ClaimFixtures, IdFixtures};

/// Builder for constructing test claims
pub struct TestClaimBuilder {
    claim: Claim,
}

impl Default for TestClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClaimBuilder {
    /// Creates a new builder seeded with the inpatient fixture
    pub fn new() -> Self {
        Self { claim: ClaimFixtures::inpatient() }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.claim.id = IdFixtures::claim_id(id);
        self
    }

    pub fn with_claim_id(mut self, id: ClaimId) -> Self {
        self.claim.id = id;
        self
    }

    pub fn with_provider(mut self, provider: &str) -> Self {
        self.claim.provider_id = Some(IdFixtures::provider_id(provider));
        self
    }

    pub fn with_provider_id(mut self, provider: Option<ProviderId>) -> Self {
        self.claim.provider_id = provider;
        self
    }

    pub fn with_diagnosis(mut self, code: Option<&str>) -> Self {
        self.claim.diagnosis_group_code = code.map(str::to_string);
        self
    }

    pub fn with_start_date(mut self, date: Option<NaiveDate>) -> Self {
        self.claim.start_date = date;
        self
    }

    pub fn with_amount(mut self, amount: Option<Decimal>) -> Self {
        self.claim.amount_reimbursed = amount;
        self
    }

    pub fn with_status(mut self, status: ClaimStatus) -> Self {
        self.claim.status = status;
        self
    }

    pub fn build(self) -> Claim {
        self.claim
    }
}

/// Builder for scoring results
pub struct TestScoringBuilder {
    label: FraudLabel,
    probability: Option<f64>,
    features: Vec<FeatureContribution>,
    explanation: Option<String>,
    raw: Option<Value>,
    payload_sent: Option<Value>,
}

impl Default for TestScoringBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestScoringBuilder {
    pub fn new() -> Self {
        Self {
            label: FraudLabel::Unknown,
            probability: None,
            features: Vec::new(),
            explanation: None,
            raw: None,
            payload_sent: None,
        }
    }

    pub fn with_label(mut self, label: FraudLabel) -> Self {
        self.label = label;
        self
    }

    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = Some(probability);
        self
    }

    pub fn with_numeric_feature(mut self, name: &str, value: f64, impact: f64) -> Self {
        self.features.push(FeatureContribution {
            name: name.to_string(),
            value: FeatureValue::Number(value),
            impact,
        });
        self
    }

    pub fn with_category_feature(mut self, name: &str, value: &str, impact: f64) -> Self {
        self.features.push(FeatureContribution {
            name: name.to_string(),
            value: FeatureValue::Category(value.to_string()),
            impact,
        });
        self
    }

    pub fn with_explanation(mut self, text: &str) -> Self {
        self.explanation = Some(text.to_string());
        self
    }

    pub fn with_raw(mut self, raw: Value) -> Self {
        self.raw = Some(raw);
        self
    }

    pub fn with_payload_sent(mut self, payload: Value) -> Self {
        self.payload_sent = Some(payload);
        self
    }

    pub fn build(self) -> ScoringResult {
        ScoringResult::new(self.label, self.probability, self.features)
            .with_explanation(self.explanation)
            .with_raw(self.raw)
            .with_payload_sent(self.payload_sent)
    }
}
