//! Strongly-typed identifiers for domain entities
//!
//! Claims and providers are keyed by identifiers the remote claims service
//! issues (`CLM9125498`, `PRV00312`). Newtype wrappers keep the two from being
//! mixed up and guarantee the value is non-empty and free of surrounding
//! whitespace. The wire format accepts either a JSON string or an integer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error produced when an identifier fails validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("{kind} must not be empty")]
    Empty { kind: &'static str },
}

/// Identifier as it may appear on the wire
#[doc(hidden)]
#[derive(Deserialize)]
#[serde(untagged)]
pub enum RawIdentifier {
    Text(String),
    Integer(u64),
}

macro_rules! define_id {
    ($name:ident, $kind:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "RawIdentifier", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier, trimming surrounding whitespace
            pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
                let trimmed = value.as_ref().trim();
                if trimmed.is_empty() {
                    return Err(IdentifierError::Empty { kind: $kind });
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Returns the identifier text
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns a human-readable name for the identifier kind
            pub fn kind() -> &'static str {
                $kind
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdentifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<RawIdentifier> for $name {
            type Error = IdentifierError;

            fn try_from(raw: RawIdentifier) -> Result<Self, Self::Error> {
                match raw {
                    RawIdentifier::Text(text) => Self::new(text),
                    RawIdentifier::Integer(n) => Self::new(n.to_string()),
                }
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }
    };
}

define_id!(ClaimId, "claim id");
define_id!(ProviderId, "provider id");
