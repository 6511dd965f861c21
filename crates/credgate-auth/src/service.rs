//! Account registration and login
//!
//! [`AuthService`] is the only component that touches plaintext passwords.
//! It hashes them on registration, verifies them on login and, on success,
//! signs a token through the shared [`JwtManager`]. Persistence goes through
//! the [`CredentialStore`] trait; every store failure is logged here and
//! surfaces to callers as [`AuthError::StoreUnavailable`].

use credgate_db::utils::normalize_email;
use credgate_db::{CredentialStore, DbError, NewUser, UserRecord};
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::error::AuthError;
use crate::jwt::{IssuedToken, JwtManager};
use crate::password::PasswordService;

/// Maximum accepted password length in bytes
pub const MAX_PASSWORD_LENGTH: usize = 256;
/// Maximum accepted display name length in characters
pub const MAX_NAME_LENGTH: usize = 128;

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    jwt: Arc<JwtManager>,
    passwords: PasswordService,
    /// Hash of a random secret, verified against when the email is unknown
    /// so both login failure paths cost one argon2 run.
    dummy_hash: Arc<str>,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        jwt: Arc<JwtManager>,
        passwords: PasswordService,
    ) -> Result<Self, AuthError> {
        let dummy_hash = passwords.hash(&Uuid::new_v4().to_string())?;

        Ok(Self {
            store,
            jwt,
            passwords,
            dummy_hash: dummy_hash.into(),
        })
    }

    /// Register a new account
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<UserRecord, AuthError> {
        let result = self.create_account(email, password, name).await;
        metrics::counter!("credgate_registrations_total", "outcome" => registration_outcome(&result))
            .increment(1);

        result
    }

    async fn create_account(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<UserRecord, AuthError> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(AuthError::InvalidInput("email is required".to_string()));
        }
        validate_password(password)?;
        let name = normalize_name(name)?;

        debug!("Registering user: {}", email);

        let password_hash = self.passwords.hash_async(password.to_string()).await?;

        let result = self
            .store
            .insert(NewUser {
                email,
                password_hash,
                name,
            })
            .await;

        match result {
            Ok(user) => {
                info!("Registered user: {}", user.email);
                Ok(user)
            }
            Err(DbError::Duplicate(detail)) => {
                debug!("Registration rejected: {}", detail);
                Err(AuthError::DuplicateEmail)
            }
            Err(e) => Err(store_unavailable(e)),
        }
    }

    /// Verify credentials and issue a token
    ///
    /// Unknown emails and wrong passwords are indistinguishable to the
    /// caller: both return [`AuthError::InvalidCredentials`] after one
    /// password verification.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IssuedToken, AuthError> {
        let result = self.check_credentials(email, password).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(AuthError::InvalidCredentials) => "invalid_credentials",
            Err(_) => "error",
        };
        metrics::counter!("credgate_logins_total", "outcome" => outcome).increment(1);

        let user = result?;
        let token = self.jwt.generate_token(&user.email)?;

        info!("User {} logged in successfully", user.email);
        Ok(token)
    }

    async fn check_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserRecord, AuthError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() || password.len() > MAX_PASSWORD_LENGTH {
            return Err(AuthError::InvalidCredentials);
        }

        debug!("Login attempt for user: {}", email);

        let user = self
            .store
            .find_by_email(&email)
            .await
            .map_err(store_unavailable)?;

        let hash_to_verify = match &user {
            Some(u) => u.password_hash.clone(),
            None => self.dummy_hash.to_string(),
        };

        let password_valid = self
            .passwords
            .verify_async(password.to_string(), hash_to_verify)
            .await?;

        match (user, password_valid) {
            (Some(u), true) => Ok(u),
            _ => Err(AuthError::InvalidCredentials),
        }
    }
}

/// Metric label for a registration result
fn registration_outcome(result: &Result<UserRecord, AuthError>) -> &'static str {
    match result {
        Ok(_) => "created",
        Err(AuthError::DuplicateEmail) => "duplicate",
        Err(AuthError::InvalidInput(_)) => "invalid_input",
        Err(_) => "error",
    }
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.is_empty() {
        return Err(AuthError::InvalidInput("password is required".to_string()));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(AuthError::InvalidInput(format!(
            "password exceeds maximum length of {} characters",
            MAX_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

fn normalize_name(name: Option<&str>) -> Result<Option<String>, AuthError> {
    let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AuthError::InvalidInput(format!(
            "name exceeds maximum length of {} characters",
            MAX_NAME_LENGTH
        )));
    }
    Ok(Some(name.to_string()))
}

fn store_unavailable(err: DbError) -> AuthError {
    error!("Credential store error: {}", err);
    AuthError::StoreUnavailable
}
