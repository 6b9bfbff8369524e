//! Fraud scoring results
//!
//! A [`ScoringResult`] exists only while a review panel is open. It is built
//! from the remote scorer's response and discarded with the panel.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::claim::Claim;

/// Label assigned by the fraud model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FraudLabel {
    Fraud,
    NotFraud,
    /// The scorer returned no label, or one this client does not recognise
    #[default]
    Unknown,
}

impl FraudLabel {
    /// Interprets a label string from the scorer
    ///
    /// Matching ignores case, spaces, hyphens and underscores, so `"Not Fraud"`,
    /// `"NOT_FRAUD"` and `"notfraud"` are the same label.
    pub fn from_wire(text: &str) -> Self {
        let folded: String = text
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        match folded.as_str() {
            "fraud" | "fraudulent" => FraudLabel::Fraud,
            "notfraud" | "nonfraud" | "legit" | "legitimate" => FraudLabel::NotFraud,
            _ => FraudLabel::Unknown,
        }
    }

    /// Label text as the claims service expects it back
    pub fn as_wire(&self) -> &'static str {
        match self {
            FraudLabel::Fraud => "Fraud",
            FraudLabel::NotFraud => "Not Fraud",
            FraudLabel::Unknown => "UNKNOWN",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, FraudLabel::Unknown)
    }
}

impl fmt::Display for FraudLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl Serialize for FraudLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for FraudLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(FraudLabel::from_wire(&text))
    }
}

/// Value a feature took for the scored claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Category(String),
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Number(n) => write!(f, "{n:.2}"),
            FeatureValue::Category(c) => f.write_str(c),
        }
    }
}

/// One feature's contribution to the fraud score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    #[serde(rename = "feature")]
    pub name: String,
    pub value: FeatureValue,
    /// Signed impact; positive values push towards fraud
    pub impact: f64,
}

impl FeatureContribution {
    pub fn raises_risk(&self) -> bool {
        self.impact > 0.0
    }
}

/// Output of one scoring request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoringResult {
    pub label: FraudLabel,
    /// Label exactly as the scorer spelled it
    pub label_text: Option<String>,
    /// Fraud probability in `[0, 1]`
    pub probability: Option<f64>,
    /// Contributions ranked by absolute impact, largest first
    pub top_features: Vec<FeatureContribution>,
    pub explanation: Option<String>,
    /// Upstream model response, kept for diagnostics
    pub raw: Option<Value>,
    /// Feature payload the service sent to the model
    pub payload_sent: Option<Value>,
    /// Provider-level aggregates the service derived for the model
    pub aggregated_data: Option<Value>,
}

impl ScoringResult {
    /// Builds a result, enforcing the probability range and feature ranking
    pub fn new(label: FraudLabel, probability: Option<f64>, top_features: Vec<FeatureContribution>) -> Self {
        Self {
            label,
            probability: checked_probability(probability),
            top_features: rank_features(top_features),
            ..Default::default()
        }
    }

    pub fn with_label_text(mut self, text: Option<String>) -> Self {
        self.label_text = text.filter(|t| !t.trim().is_empty());
        self
    }

    /// Label to report back with a decision
    ///
    /// The scorer's own spelling wins, recognised or not. Without it, a known
    /// label falls back to its canonical text.
    pub fn evidence_label(&self) -> Option<String> {
        self.label_text
            .clone()
            .or_else(|| self.label.is_known().then(|| self.label.as_wire().to_string()))
    }

    pub fn with_explanation(mut self, explanation: Option<String>) -> Self {
        self.explanation = explanation.filter(|e| !e.trim().is_empty());
        self
    }

    pub fn with_raw(mut self, raw: Option<Value>) -> Self {
        self.raw = raw.filter(|v| !v.is_null());
        self
    }

    pub fn with_payload_sent(mut self, payload: Option<Value>) -> Self {
        self.payload_sent = payload.filter(|v| !v.is_null());
        self
    }

    pub fn with_aggregated_data(mut self, aggregated: Option<Value>) -> Self {
        self.aggregated_data = aggregated.filter(|v| !v.is_null());
        self
    }

    /// Probability as a percentage with one decimal, e.g. `"73.0%"`
    pub fn probability_percent(&self) -> Option<String> {
        self.probability.map(|p| format!("{:.1}%", p * 100.0))
    }

    pub fn has_raw(&self) -> bool {
        self.raw.is_some()
    }
}

/// Scoring result together with the service's authoritative claim record
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringReport {
    pub result: ScoringResult,
    /// Claim as stored by the service, when the response carried one
    pub claim: Option<Claim>,
}

impl ScoringReport {
    pub fn new(result: ScoringResult) -> Self {
        Self { result, claim: None }
    }

    pub fn with_claim(mut self, claim: Claim) -> Self {
        self.claim = Some(claim);
        self
    }
}

fn checked_probability(probability: Option<f64>) -> Option<f64> {
    match probability {
        Some(p) if p.is_finite() && (0.0..=1.0).contains(&p) => Some(p),
        Some(p) => {
            tracing::warn!(probability = p, "Discarding out-of-range fraud probability");
            None
        }
        None => None,
    }
}

fn rank_features(mut features: Vec<FeatureContribution>) -> Vec<FeatureContribution> {
    features.sort_by(|a, b| b.impact.abs().total_cmp(&a.impact.abs()));
    features
}
