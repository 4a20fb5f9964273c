//! HTTP middleware for axum.
//!
//! - `auth` - Bearer token validation and identity extractors
//! - `access` - Policy Gate as a route layer

pub mod access;
pub mod auth;

pub use access::{require_access, AccessGuard, RESOURCE_ID_PARAM};
pub use auth::{auth_middleware, AuthRejection, AuthState, OptionalAuth, RequireAuth};
