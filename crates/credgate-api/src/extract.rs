//! Request body extractor accepting JSON or URL-encoded forms

use axum::{
    Form, Json,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ApiError;

/// Deserializes the body as a form when the request says
/// `application/x-www-form-urlencoded`, and as JSON otherwise
pub struct JsonOrForm<T>(pub T);

impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(value) = Form::<T>::from_request(req, state).await.map_err(|e| {
                debug!("Rejected form body: {}", e.body_text());
                ApiError::BadRequest("malformed request body".to_string())
            })?;
            Ok(Self(value))
        } else {
            let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
                debug!("Rejected JSON body: {}", e.body_text());
                ApiError::BadRequest("malformed request body".to_string())
            })?;
            Ok(Self(value))
        }
    }
}
