//! Wire shapes of the claims service
//!
//! These structs accept what the service actually sends, which is looser
//! than the domain model: missing arrays, labels in any spelling, numbers
//! where strings are expected. Conversion into domain types happens here so
//! the adapter hands the desk only well-formed values.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use domain_claims::{
    AdminSummary, Claim, FeatureContribution, FeatureValue, FraudLabel, ScoringReport,
    ScoringResult, SummaryCounters,
};

/// Body of `GET /admin-score/score/{claimId}`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResponse {
    #[serde(default)]
    pub label: Option<String>,
    /// Only JSON numbers count as a probability
    #[serde(default)]
    pub probability: Option<Value>,
    #[serde(default)]
    pub top_features: Option<Vec<Value>>,
    #[serde(default)]
    pub ai_explanation: Option<String>,
    #[serde(default)]
    pub raw: Option<Value>,
    #[serde(default)]
    pub raw_claim: Option<Value>,
    #[serde(default)]
    pub payload_sent: Option<Value>,
    #[serde(default)]
    pub aggregated_data: Option<Value>,
}

impl ScoreResponse {
    pub fn into_report(self) -> ScoringReport {
        let label = self.label.as_deref().map_or(FraudLabel::Unknown, FraudLabel::from_wire);
        let probability = self.probability.as_ref().and_then(Value::as_f64);
        let features = self
            .top_features
            .unwrap_or_default()
            .into_iter()
            .filter_map(feature_from_wire)
            .collect();

        let result = ScoringResult::new(label, probability, features)
            .with_label_text(self.label)
            .with_explanation(self.ai_explanation)
            .with_raw(self.raw)
            .with_payload_sent(self.payload_sent)
            .with_aggregated_data(self.aggregated_data);

        let report = ScoringReport::new(result);
        match self.raw_claim.and_then(claim_from_wire) {
            Some(claim) => report.with_claim(claim),
            None => report,
        }
    }
}

#[derive(Deserialize)]
struct FeatureWire {
    feature: String,
    #[serde(default)]
    value: Option<FeatureValue>,
    #[serde(default)]
    impact: Option<f64>,
}

fn feature_from_wire(raw: Value) -> Option<FeatureContribution> {
    match serde_json::from_value::<FeatureWire>(raw) {
        Ok(wire) => Some(FeatureContribution {
            name: wire.feature,
            value: wire.value.unwrap_or_else(|| FeatureValue::Category(String::new())),
            impact: wire.impact.filter(|i| i.is_finite()).unwrap_or(0.0),
        }),
        Err(e) => {
            debug!(error = %e, "Skipping malformed feature contribution");
            None
        }
    }
}

/// Decodes a claim record, returning `None` for anything unusable
pub fn claim_from_wire(raw: Value) -> Option<Claim> {
    if raw.is_null() {
        return None;
    }
    match serde_json::from_value::<Claim>(raw) {
        Ok(claim) => Some(claim),
        Err(e) => {
            debug!(error = %e, "Claim record not decodable");
            None
        }
    }
}

/// Decodes the pending list, dropping records without a usable identifier
pub fn claims_from_wire(raw: Option<Vec<Value>>) -> Vec<Claim> {
    let records = raw.unwrap_or_default();
    let total = records.len();
    let claims: Vec<Claim> = records.into_iter().filter_map(claim_from_wire).collect();
    if claims.len() < total {
        warn!(dropped = total - claims.len(), total, "Pending list contained undecodable claims");
    }
    claims
}

/// Decodes the admin summary; a null body reads as all zeros
pub fn summary_from_wire(raw: Option<AdminSummary>) -> SummaryCounters {
    raw.map(|s| s.overall).unwrap_or_default()
}

/// Error body the service sends with non-success statuses
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ErrorBody {
    /// Parses an error body; anything that is not the expected JSON carries
    /// no message
    pub fn parse(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_score_response() {
        let response: ScoreResponse = serde_json::from_value(json!({
            "label": "Fraud",
            "probability": 0.73,
            "topFeatures": [
                { "feature": "DiagnosisGroupCode", "value": "201", "impact": 0.1 },
                { "feature": "InscClaimAmtReimbursed", "value": 26000, "impact": -0.4 }
            ],
            "aiExplanation": "High reimbursement.",
            "raw": { "prediction": 1 },
            "rawClaim": { "ClaimID": "CLM46116", "Provider": "PRV51001", "DiagnosisGroupCode": 201 },
            "payloadSent": { "amount": 26000 },
            "aggregatedData": { "providerClaims": 41 }
        }))
        .unwrap();

        let report = response.into_report();
        assert_eq!(report.result.label, FraudLabel::Fraud);
        assert_eq!(report.result.probability, Some(0.73));
        assert_eq!(report.result.top_features[0].name, "InscClaimAmtReimbursed");
        assert_eq!(report.result.explanation.as_deref(), Some("High reimbursement."));
        assert!(report.result.aggregated_data.is_some());
        let claim = report.claim.unwrap();
        assert_eq!(claim.diagnosis_group_code.as_deref(), Some("201"));
    }

    #[test]
    fn test_score_response_keeps_label_spelling() {
        let response: ScoreResponse = serde_json::from_value(json!({
            "label": "NOT_FRAUD",
            "probability": 0.2
        }))
        .unwrap();

        let report = response.into_report();
        assert_eq!(report.result.label, FraudLabel::NotFraud);
        assert_eq!(report.result.evidence_label().as_deref(), Some("NOT_FRAUD"));
    }

    #[test]
    fn test_sparse_score_response() {
        let response: ScoreResponse = serde_json::from_value(json!({
            "probability": "0.4",
            "rawClaim": { "Provider": "PRV1" },
            "topFeatures": [{ "value": 1 }, { "feature": "Age" }]
        }))
        .unwrap();

        let report = response.into_report();
        assert_eq!(report.result.label, FraudLabel::Unknown);
        assert_eq!(report.result.label_text, None);
        assert_eq!(report.result.probability, None);
        assert_eq!(report.result.top_features.len(), 1);
        assert_eq!(report.result.top_features[0].impact, 0.0);
        assert!(report.claim.is_none());
    }

    #[test]
    fn test_pending_list_skips_bad_records() {
        let claims = claims_from_wire(Some(vec![
            json!({ "ClaimID": "CLM1" }),
            json!({ "ClaimID": "" }),
            json!("garbage"),
            json!({ "ClaimID": 77, "status": "approved" }),
        ]));
        assert_eq!(claims.len(), 2);
        assert_eq!(claims[1].id.as_str(), "77");
        assert!(claims_from_wire(None).is_empty());
    }

    #[test]
    fn test_pending_list_keeps_records_with_loose_fields() {
        let claims = claims_from_wire(Some(vec![
            json!({ "ClaimID": "CLM1", "InscClaimAmtReimbursed": "" }),
            json!({ "ClaimID": "CLM2", "ClaimStartDt": 1239494400000_i64 }),
            json!({ "ClaimID": "CLM3", "Provider": "PRV1", "status": "on hold" }),
        ]));

        let ids: Vec<&str> = claims.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["CLM1", "CLM2", "CLM3"]);
        assert_eq!(claims[0].amount_reimbursed, None);
        assert_eq!(claims[1].start_date, chrono::NaiveDate::from_ymd_opt(2009, 4, 12));
        assert_eq!(claims[2].status, domain_claims::ClaimStatus::Pending);
    }

    #[test]
    fn test_error_body_tolerant() {
        let body = ErrorBody::parse(br#"{"error":"Claim locked"}"#);
        assert_eq!(body.error.as_deref(), Some("Claim locked"));
        let html = ErrorBody::parse(b"<html>Bad Gateway</html>");
        assert!(html.error.is_none() && html.detail.is_none());
    }
}
