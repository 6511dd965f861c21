//! credgate authentication and authorization
//!
//! This crate owns the credential lifecycle: argon2 password hashing,
//! account registration and login ([`AuthService`]), signed expiring JWTs
//! ([`JwtManager`]) and the request guard that checks them ([`AccessGate`]).

pub mod error;
pub mod gate;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod service;

pub use error::AuthError;
pub use gate::{AccessGate, Identity};
pub use jwt::{Claims, IssuedToken, JwtManager};
pub use middleware::{extract_token, require_identity};
pub use password::{HashParams, PasswordService};
pub use service::AuthService;
