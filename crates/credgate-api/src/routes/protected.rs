//! Token-gated routes

use axum::{Extension, Json, Router, middleware::from_fn_with_state, routing::get};
use credgate_auth::{Identity, require_identity};

use crate::state::AppState;

use super::types::{IdentityResponse, ProtectedResponse};

/// GET /protected
async fn protected(Extension(identity): Extension<Identity>) -> Json<ProtectedResponse> {
    Json(ProtectedResponse {
        message: "You have access to protected route".to_string(),
        email: identity.email,
    })
}

/// GET /me
async fn me(Extension(identity): Extension<Identity>) -> Json<IdentityResponse> {
    Json(IdentityResponse {
        email: identity.email,
        issued_at: identity.issued_at.to_rfc3339(),
        expires_at: identity.expires_at.to_rfc3339(),
    })
}

/// Create protected routes, all behind the access gate
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/protected", get(protected))
        .route("/me", get(me))
        .route_layer(from_fn_with_state(state.gate.clone(), require_identity))
}
