//! HTTP adapters - REST API implementations.

pub mod entitlements;
pub mod error;
pub mod middleware;

use axum::{middleware::from_fn_with_state, Router};

pub use entitlements::{entitlements_router, EntitlementsAppState};
pub use error::{AccessApiError, DenialResponse, ErrorResponse};
pub use middleware::{auth_middleware, require_access, AccessGuard, AuthState};

/// The `/api` router with bearer authentication applied.
///
/// Transport layers (tracing, timeouts, CORS) are left to the caller.
pub fn api_router(state: EntitlementsAppState, validator: AuthState) -> Router {
    Router::new()
        .nest("/api", entitlements_router())
        .with_state(state)
        .layer(from_fn_with_state(validator, auth_middleware))
}
