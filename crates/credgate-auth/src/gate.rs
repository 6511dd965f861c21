//! Access gate for protected operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::error::AuthError;
use crate::jwt::JwtManager;

/// Identity proven by a valid token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Stateless token check
///
/// Authorization depends only on the presented token, the signing secret
/// held by the [`JwtManager`] and the clock. No store lookup happens here.
#[derive(Clone)]
pub struct AccessGate {
    jwt: Arc<JwtManager>,
}

impl AccessGate {
    pub fn new(jwt: Arc<JwtManager>) -> Self {
        Self { jwt }
    }

    /// Authorize a presented token against the current time
    pub fn authorize(&self, presented: Option<&str>) -> Result<Identity, AuthError> {
        self.authorize_at(presented, Utc::now())
    }

    /// Authorize a presented token against an explicit clock
    pub fn authorize_at(
        &self,
        presented: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Identity, AuthError> {
        let result = self.check(presented, now);

        let outcome = match &result {
            Ok(_) => "allowed",
            Err(AuthError::Expired) => "expired",
            Err(_) => "denied",
        };
        metrics::counter!("credgate_authorizations_total", "outcome" => outcome).increment(1);

        result
    }

    fn check(&self, presented: Option<&str>, now: DateTime<Utc>) -> Result<Identity, AuthError> {
        let token = presented
            .map(str::trim)
            .filter(|t| is_well_formed(t))
            .ok_or(AuthError::Unauthorized)?;

        let claims = self.jwt.validate_token_at(token, now)?;

        let issued_at = DateTime::from_timestamp(claims.iat, 0).ok_or(AuthError::Unauthorized)?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or(AuthError::Unauthorized)?;

        debug!("Authorized user: {}", claims.sub);

        Ok(Identity {
            email: claims.sub,
            issued_at,
            expires_at,
        })
    }
}

/// Cheap shape check before any signature work: three non-empty
/// base64url segments separated by dots.
fn is_well_formed(token: &str) -> bool {
    let mut segments = 0;
    for segment in token.split('.') {
        segments += 1;
        if segment.is_empty()
            || !segment
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return false;
        }
    }
    segments == 3
}
