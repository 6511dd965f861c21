//! Shared utility functions

use chrono::{DateTime, Utc};

/// Parse a stored RFC 3339 timestamp
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}

/// Canonical form of an email used as the store key
///
/// Surrounding whitespace is dropped and ASCII letters are lowercased, so
/// `" Ann@Example.COM "` and `"ann@example.com"` address the same account.
///
/// # Examples
///
/// ```
/// use credgate_db::utils::normalize_email;
///
/// assert_eq!(normalize_email(" Ann@Example.COM "), "ann@example.com");
/// ```
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}
