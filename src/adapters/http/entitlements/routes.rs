//! Axum router configuration for entitlement endpoints.

use axum::{routing::get, Router};

use super::handlers::{
    check_capability_access, check_resource_access, get_my_entitlements, EntitlementsAppState,
};

/// Create the entitlement API router, mounted at `/api/entitlements`.
///
/// # Routes
/// - `GET /me` - Current subscriber's tier, bundle, usage and remaining allowance
/// - `GET /access/:resource_type` - Access pre-check for a capability
/// - `GET /access/:resource_type/:resource_id` - Access pre-check for an instance
///
/// `/me` requires authentication. The access routes answer 401 through the
/// Policy Gate when no subscriber is present.
pub fn entitlements_routes() -> Router<EntitlementsAppState> {
    Router::new()
        .route("/me", get(get_my_entitlements))
        .route("/access/:resource_type", get(check_capability_access))
        .route(
            "/access/:resource_type/:resource_id",
            get(check_resource_access),
        )
}

/// Create the complete entitlement module router under `/entitlements`.
pub fn entitlements_router() -> Router<EntitlementsAppState> {
    Router::new().nest("/entitlements", entitlements_routes())
}
