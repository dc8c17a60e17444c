//! Session token issuance and verification.
//!
//! Tokens are HS256 JWTs signed with the server secret. Nothing is persisted:
//! a token is valid until its `exp` passes, and there is no revocation list.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Role;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Access token missing")]
    Missing,

    /// Bad signature, malformed claims, or expired.
    #[error("Access token invalid: {0}")]
    Invalid(String),

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

/// Identity facts embedded in a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: i32,
    pub username: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Who a token is being issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub id: i32,
    pub username: String,
    pub role: Role,
}

#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    #[must_use]
    pub fn new(secret: &str, ttl_hours: u32) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(i64::from(ttl_hours)),
        }
    }

    pub fn issue(&self, subject: &Subject) -> Result<String, TokenError> {
        self.issue_at(subject, Utc::now())
    }

    pub(crate) fn issue_at(
        &self,
        subject: &Subject,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            id: subject.id,
            username: subject.username.clone(),
            role: subject.role,
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Checks signature and expiry. `None` means no credential was presented.
    pub fn verify(&self, token: Option<&str>) -> Result<Claims, TokenError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(TokenError::Missing)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::Invalid(e.to_string()))
    }
}
