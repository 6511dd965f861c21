//! Authentication middleware for Axum

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::error::AuthError;
use crate::gate::AccessGate;

/// Extract the token from an `Authorization` header value
///
/// `Bearer <token>` is the expected form (scheme matched case-insensitively);
/// a bare token is accepted too.
pub fn extract_token(header: &str) -> Option<&str> {
    let token = match header.trim_start().split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest,
        _ => header,
    }
    .trim();
    (!token.is_empty()).then_some(token)
}

/// Authentication middleware
///
/// Runs the [`AccessGate`] on the Authorization header and, if the token is
/// valid, adds the resulting [`Identity`](crate::Identity) to request
/// extensions. Requests without a valid token never reach the handler.
pub async fn require_identity(
    State(gate): State<AccessGate>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let presented = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_token);

    let identity = gate.authorize(presented)?;
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
