//! Operator session and admin guard
//!
//! The session holds the token issued at login. It is decoded on every
//! privileged action rather than once at startup, so an expiring token is
//! noticed the moment it lapses. The console does not hold the signing key;
//! the service verifies signatures, and the console only reads the role and
//! expiry from the payload.

use std::collections::HashSet;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use core_kernel::CredentialSource;

/// Role carried by the session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Provider,
    #[serde(other)]
    Unknown,
}

/// Token payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
    #[serde(rename = "providerId", default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    /// Expiration timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Session errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No session token configured")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Missing permission: {0}")]
    MissingPermission(String),
}

/// Operator session backed by a bearer token
#[derive(Clone, Default)]
pub struct Session {
    token: Option<String>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("has_token", &self.token.is_some())
            .finish()
    }
}

impl Session {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Decodes the token payload and checks its expiry
    ///
    /// # Errors
    ///
    /// * `MissingToken` - no token was configured
    /// * `TokenExpired` - the payload's `exp` has passed
    /// * `InvalidToken` - the token is not a decodable JWT
    pub fn claims(&self) -> Result<SessionClaims, SessionError> {
        let token = self.token.as_deref().ok_or(SessionError::MissingToken)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();

        let data = decode::<SessionClaims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => SessionError::TokenExpired,
                _ => SessionError::InvalidToken,
            })?;

        if data.claims.exp.is_some_and(|exp| exp <= Utc::now().timestamp()) {
            return Err(SessionError::TokenExpired);
        }
        Ok(data.claims)
    }

    /// Re-validates the session and requires the admin role
    pub fn require_admin(&self) -> Result<SessionClaims, SessionError> {
        let claims = self.claims()?;
        if claims.role != Role::Admin {
            return Err(SessionError::MissingPermission("admin".to_string()));
        }
        Ok(claims)
    }
}

impl CredentialSource for Session {
    fn bearer_token(&self) -> Option<String> {
        self.token.clone()
    }
}
