//! Request/Response DTOs

use serde::{Deserialize, Serialize};

// ==================== Auth Types ====================

/// Signup request
///
/// Missing fields deserialize as empty so that validation reports them
/// the same way as blank ones.
#[derive(Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login response
#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: i64,
}

/// Plain message response
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ==================== Protected Types ====================

/// Response of the example protected route
#[derive(Serialize)]
pub struct ProtectedResponse {
    pub message: String,
    pub email: String,
}

/// Identity bound to the presented token
#[derive(Serialize)]
pub struct IdentityResponse {
    pub email: String,
    pub issued_at: String,
    pub expires_at: String,
}
