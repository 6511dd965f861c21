//! Signup and login routes

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use tracing::debug;

use crate::error::ApiError;
use crate::extract::JsonOrForm;
use crate::state::AppState;

use super::types::{LoginRequest, LoginResponse, MessageResponse, SignupRequest};

// ==================== Input Validation ====================

/// Maximum allowed email length
const MAX_EMAIL_LENGTH: usize = 254;

/// Basic address shape check: `local@domain.tld`, no whitespace
///
/// Full RFC 5322 validation is deliberately out of scope; this only keeps
/// obvious garbage out of the store.
fn validate_email_shape(email: &str) -> Result<(), ApiError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ApiError::BadRequest("email is required".to_string()));
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "email exceeds maximum length of {} characters",
            MAX_EMAIL_LENGTH
        )));
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.split('.').count() >= 2
                && domain.split('.').all(|part| !part.is_empty())
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(ApiError::BadRequest("email is not a valid address".to_string()));
    }
    Ok(())
}

// ==================== Auth Routes ====================

/// POST /signup
async fn signup(
    State(state): State<AppState>,
    JsonOrForm(request): JsonOrForm<SignupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    validate_email_shape(&request.email)?;

    state
        .auth
        .register(&request.email, &request.password, request.name.as_deref())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User created".to_string(),
        }),
    ))
}

/// POST /login
async fn login(
    State(state): State<AppState>,
    JsonOrForm(request): JsonOrForm<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    debug!("Login request received");

    let issued = state
        .auth
        .authenticate(&request.email, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        token: issued.token,
        expires_in: issued.expires_in,
    }))
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email_shape() {
        for ok in ["a@x.com", "first.last@sub.example.org", " a@x.com "] {
            assert!(validate_email_shape(ok).is_ok(), "rejected {}", ok);
        }
        for bad in ["", "ax.com", "@x.com", "a@x", "a@x.", "a@.com", "a@@x.com", "a b@x.com"] {
            assert!(validate_email_shape(bad).is_err(), "accepted {}", bad);
        }
    }
}
