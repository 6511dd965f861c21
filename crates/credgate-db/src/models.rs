//! Database models

use crate::utils::parse_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;

/// Stored user record
///
/// Created once at registration and never modified afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    /// Normalized email, unique across the store
    pub email: String,
    /// PHC-formatted password hash, never the plaintext
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// New user (for insertion)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for UserRecord {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        let created_at = parse_datetime(&row.try_get::<String, _>("created_at")?).map_err(|e| {
            sqlx::Error::ColumnDecode {
                index: "created_at".to_string(),
                source: Box::new(e),
            }
        })?;

        Ok(UserRecord {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            name: row.try_get("name")?,
            created_at,
        })
    }
}
