//! Authentication error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Email already exists")]
    DuplicateEmail,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Token expired")]
    Expired,

    #[error("Credential store unavailable")]
    StoreUnavailable,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// HTTP status and the client-facing message for this error
    ///
    /// Infrastructure failures collapse into one generic message; their
    /// detail is only ever logged.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AuthError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AuthError::DuplicateEmail => (StatusCode::BAD_REQUEST, self.to_string()),
            AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
            AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            AuthError::Expired => (StatusCode::UNAUTHORIZED, self.to_string()),
            AuthError::StoreUnavailable
            | AuthError::PasswordHash(_)
            | AuthError::Jwt(_)
            | AuthError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        let body = axum::Json(json!({
            "message": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_errors_hide_detail() {
        let (status, message) =
            AuthError::PasswordHash("invalid salt length".to_string()).status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Server error");

        let (status, message) = AuthError::StoreUnavailable.status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Server error");
    }

    #[test]
    fn test_client_errors() {
        assert_eq!(
            AuthError::InvalidCredentials.status_and_message(),
            (StatusCode::UNAUTHORIZED, "Invalid email or password".to_string())
        );
        assert_eq!(
            AuthError::DuplicateEmail.status_and_message(),
            (StatusCode::BAD_REQUEST, "Email already exists".to_string())
        );
        assert_eq!(
            AuthError::Expired.status_and_message(),
            (StatusCode::UNAUTHORIZED, "Token expired".to_string())
        );
    }
}
