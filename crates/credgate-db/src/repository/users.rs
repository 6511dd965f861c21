//! User operations

use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{NewUser, UserRecord};
use crate::repository::Database;
use crate::store::CredentialStore;

impl Database {
    // ==================== User Operations ====================

    /// Insert a new user
    ///
    /// Uniqueness is enforced by the `UNIQUE` constraint on `email` inside a
    /// single statement, so there is no window between checking and writing.
    pub async fn insert_user(&self, user: NewUser) -> Result<UserRecord, DbError> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO users (email, password_hash, name, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(email) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(now.to_rfc3339())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                DbError::Duplicate(format!("User '{}' already exists", user.email))
            }
            other => DbError::from(other),
        })?;

        let Some(row) = result else {
            return Err(DbError::Duplicate(format!(
                "User '{}' already exists",
                user.email
            )));
        };

        let id: i64 = row.get("id");

        Ok(UserRecord {
            id,
            email: user.email,
            password_hash: user.password_hash,
            name: user.name,
            created_at: now,
        })
    }

    /// Get a user by email
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, email, password_hash, name, created_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        result
            .map(|row| UserRecord::try_from(&row).map_err(DbError::from))
            .transpose()
    }

    /// Count users
    pub async fn count_users(&self) -> Result<i64, DbError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(result.get("count"))
    }

    /// Count users with the given email (0 or 1 while the constraint holds)
    pub async fn count_users_by_email(&self, email: &str) -> Result<i64, DbError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(result.get("count"))
    }
}

#[async_trait]
impl CredentialStore for Database {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DbError> {
        self.get_user_by_email(email).await
    }

    async fn insert(&self, user: NewUser) -> Result<UserRecord, DbError> {
        self.insert_user(user).await
    }

    async fn count(&self) -> Result<i64, DbError> {
        self.count_users().await
    }
}
