//! Unit tests for the Identifiers module
//!
//! Tests cover creation, parsing, display and the wire format of the
//! service-issued identifiers.

use core_kernel::{ClaimId, ProviderId, IdentifierError};
use proptest::prelude::*;

mod claim_id_tests {
    use super::*;

    #[test]
    fn test_kind() {
        assert_eq!(ClaimId::kind(), "claim id");
        assert_eq!(ProviderId::kind(), "provider id");
    }

    #[test]
    fn test_display_is_raw_value() {
        let id = ClaimId::new("CLM9125498").unwrap();
        assert_eq!(format!("{id}"), "CLM9125498");
        assert_eq!(id.as_str(), "CLM9125498");
    }

    #[test]
    fn test_from_str_trims() {
        let id: ClaimId = "\tCLM1 \n".parse().unwrap();
        assert_eq!(id.as_str(), "CLM1");
    }

    #[test]
    fn test_blank_rejected() {
        assert_eq!(
            "  ".parse::<ClaimId>().unwrap_err(),
            IdentifierError::Empty { kind: "claim id" }
        );
    }

    #[test]
    fn test_json_string_round_trip() {
        let id = ClaimId::new("CLM42").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"CLM42\"");
        let back: ClaimId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_json_integer_accepted() {
        let id: ClaimId = serde_json::from_str("9125498").unwrap();
        assert_eq!(id.as_str(), "9125498");
    }

    #[test]
    fn test_json_empty_string_rejected() {
        assert!(serde_json::from_str::<ClaimId>("\"\"").is_err());
    }
}

mod provider_id_tests {
    use super::*;

    #[test]
    fn test_ordering_follows_text() {
        let a = ProviderId::new("PRV001").unwrap();
        let b = ProviderId::new("PRV002").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_into_string() {
        let id = ProviderId::new("PRV00312").unwrap();
        let text: String = id.into();
        assert_eq!(text, "PRV00312");
    }
}

proptest! {
    #[test]
    fn prop_non_blank_ids_parse_to_trimmed_text(text in "[A-Za-z0-9]{1,16}", pad in " {0,3}") {
        let padded = format!("{pad}{text}{pad}");
        let id = ClaimId::new(&padded).unwrap();
        prop_assert_eq!(id.as_str(), text.as_str());
    }
}
