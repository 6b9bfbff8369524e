//! Claim records as held by the review queue

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use core_kernel::{ClaimId, ProviderId};

/// Claim status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimStatus {
    /// Awaiting an operator decision
    #[default]
    #[serde(alias = "pending", alias = "PENDING")]
    Pending,
    /// Approved by an operator
    #[serde(alias = "approved", alias = "APPROVED")]
    Approved,
    /// Rejected by an operator
    #[serde(alias = "rejected", alias = "REJECTED")]
    Rejected,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "Pending",
            ClaimStatus::Approved => "Approved",
            ClaimStatus::Rejected => "Rejected",
        }
    }
}

/// A reimbursement claim under review
///
/// Field names follow the remote claims service. The client never mutates a
/// claim; each load cycle replaces the cached copies wholesale.
///
/// Only `ClaimID` is required. Any other field that cannot be read is left
/// empty rather than failing the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier
    #[serde(rename = "ClaimID")]
    pub id: ClaimId,
    /// Billing provider
    #[serde(
        rename = "Provider",
        default,
        deserialize_with = "lenient_provider",
        skip_serializing_if = "Option::is_none"
    )]
    pub provider_id: Option<ProviderId>,
    /// Claim start date
    #[serde(rename = "ClaimStartDt", default, with = "start_date", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Amount reimbursed by the insurer
    #[serde(
        rename = "InscClaimAmtReimbursed",
        default,
        deserialize_with = "lenient_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount_reimbursed: Option<Decimal>,
    /// Diagnosis group code
    #[serde(
        rename = "DiagnosisGroupCode",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub diagnosis_group_code: Option<String>,
    /// Status; absent or unrecognized on the wire means pending
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: ClaimStatus,
}

impl Claim {
    /// Creates a pending claim with only its identifier set
    pub fn pending(id: ClaimId) -> Self {
        Self {
            id,
            provider_id: None,
            start_date: None,
            amount_reimbursed: None,
            diagnosis_group_code: None,
            status: ClaimStatus::Pending,
        }
    }

    /// The fields an operator can search on, in display order
    pub fn searchable_fields(&self) -> [&str; 3] {
        [
            self.id.as_str(),
            self.provider_id.as_ref().map(ProviderId::as_str).unwrap_or(""),
            self.diagnosis_group_code.as_deref().unwrap_or(""),
        ]
    }
}

/// Codes are sometimes exported as bare numbers
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_provider<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<ProviderId>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => ProviderId::new(s).ok(),
        Some(Value::Number(n)) => ProviderId::new(n.to_string()).ok(),
        _ => None,
    })
}

/// Amounts come as numbers or numeric strings; blanks and junk read as absent
fn lenient_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Decimal>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => Decimal::from_str(&n.to_string())
            .ok()
            .or_else(|| n.as_f64().and_then(Decimal::from_f64)),
        Some(Value::String(s)) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    })
}

fn lenient_status<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ClaimStatus, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|value| serde_json::from_value::<ClaimStatus>(value).ok())
        .unwrap_or_default())
}

/// `ClaimStartDt` arrives as a plain date, an ISO date-time or epoch
/// milliseconds. Anything else is treated as absent.
mod start_date {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(text)) => parse(&text),
            Some(Value::Number(n)) => n
                .as_i64()
                .and_then(DateTime::<Utc>::from_timestamp_millis)
                .map(|stamp| stamp.date_naive()),
            _ => None,
        })
    }

    pub(super) fn parse(text: &str) -> Option<NaiveDate> {
        let text = text.trim();
        if let Ok(stamp) = DateTime::parse_from_rfc3339(text) {
            return Some(stamp.date_naive());
        }
        if let Ok(stamp) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(stamp.date());
        }
        NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
    }
}
