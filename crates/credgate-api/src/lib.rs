//! credgate REST API
//!
//! This crate provides the Axum-based HTTP surface: account signup, login,
//! the token-gated routes, health checks and the Prometheus endpoint.

pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{AppState, MetricsHandle};
