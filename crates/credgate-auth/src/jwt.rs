//! JWT token management

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::AuthError;

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (normalized email)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Unique token ID
    pub jti: String,
}

/// A freshly signed token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    /// Lifetime in seconds
    pub expires_in: i64,
}

/// JWT manager for token generation and validation
///
/// Holds the server signing secret. Built once at startup and shared
/// read-only between requests.
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
}

impl JwtManager {
    /// Create a new JWT manager
    pub fn new(secret: &str, token_expiry_hours: i64) -> Self {
        Self::with_ttl(secret, Duration::hours(token_expiry_hours))
    }

    /// Create a JWT manager with an arbitrary token lifetime
    pub fn with_ttl(secret: &str, token_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl,
        }
    }

    /// Generate a JWT token for a user
    pub fn generate_token(&self, email: &str) -> Result<IssuedToken, AuthError> {
        self.generate_token_at(email, Utc::now())
    }

    /// Generate a JWT token as if issued at `issued_at`
    pub fn generate_token_at(
        &self,
        email: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthError> {
        let expires_at = issued_at + self.token_ttl;

        let claims = Claims {
            sub: email.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        debug!("Generating token for user: {}", email);

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;

        Ok(IssuedToken {
            token,
            expires_at,
            expires_in: self.token_ttl.num_seconds(),
        })
    }

    /// Validate a JWT token and return claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate_token_at(token, Utc::now())
    }

    /// Validate a JWT token against an explicit clock
    ///
    /// Signature failures and malformed tokens yield
    /// [`AuthError::Unauthorized`]; a correctly signed token whose `exp` is
    /// not after `now` yields [`AuthError::Expired`].
    pub fn validate_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below against the caller's clock, without leeway.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            debug!("Rejected token: {:?}", e.kind());
            AuthError::Unauthorized
        })?;

        if token_data.claims.exp <= now.timestamp() {
            return Err(AuthError::Expired);
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_generation_and_validation() {
        let manager = JwtManager::new("test-secret-key", 24);

        let issued = manager.generate_token("a@x.com").unwrap();
        let claims = manager.validate_token(&issued.token).unwrap();

        assert_eq!(claims.sub, "a@x.com");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
        assert_eq!(issued.expires_in, 24 * 3600);
    }

    #[test]
    fn test_invalid_token() {
        let manager = JwtManager::new("test-secret-key", 24);

        let result = manager.validate_token("invalid-token");
        assert!(matches!(result, Err(AuthError::Unauthorized)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = JwtManager::new("test-secret-key", 24);
        let other = JwtManager::new("another-secret-key", 24);

        let issued = issuer.generate_token("a@x.com").unwrap();
        assert!(matches!(
            other.validate_token(&issued.token),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn test_expired_token() {
        let manager = JwtManager::new("test-secret-key", 1);
        let issued_at = Utc::now() - Duration::hours(2);

        let issued = manager.generate_token_at("a@x.com", issued_at).unwrap();

        assert!(matches!(
            manager.validate_token(&issued.token),
            Err(AuthError::Expired)
        ));
        // Still valid for a clock inside its lifetime
        let claims = manager
            .validate_token_at(&issued.token, issued_at + Duration::minutes(30))
            .unwrap();
        assert_eq!(claims.sub, "a@x.com");
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let manager = JwtManager::new("test-secret-key", 1);
        let issued = manager.generate_token("a@x.com").unwrap();

        assert!(matches!(
            manager.validate_token_at(&issued.token, issued.expires_at),
            Err(AuthError::Expired)
        ));
    }

    #[test]
    fn test_tokens_are_unique_per_issue() {
        let manager = JwtManager::new("test-secret-key", 24);
        let now = Utc::now();

        let first = manager.generate_token_at("a@x.com", now).unwrap();
        let second = manager.generate_token_at("a@x.com", now).unwrap();

        assert_ne!(first.token, second.token);
        assert!(manager.validate_token(&first.token).is_ok());
        assert!(manager.validate_token(&second.token).is_ok());
    }
}
