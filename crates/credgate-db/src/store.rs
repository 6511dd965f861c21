//! Credential store trait

use async_trait::async_trait;

use crate::error::DbError;
use crate::models::{NewUser, UserRecord};

/// Durable mapping from email to user record
///
/// Implementations must make [`insert`](CredentialStore::insert) an atomic
/// check-and-insert: when several callers race on the same email, exactly one
/// succeeds and every other caller gets [`DbError::Duplicate`].
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up a user by (normalized) email
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DbError>;

    /// Insert a user if no record exists for its email
    async fn insert(&self, user: NewUser) -> Result<UserRecord, DbError>;

    /// Number of stored users
    async fn count(&self) -> Result<i64, DbError>;
}
