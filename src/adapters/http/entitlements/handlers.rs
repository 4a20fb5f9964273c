//! HTTP handlers for entitlement endpoints.
//!
//! These handlers connect axum routes to the entitlement query handlers.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::response::IntoResponse;

use crate::adapters::http::error::AccessApiError;
use crate::adapters::http::middleware::{OptionalAuth, RequireAuth};
use crate::application::access::{PolicyGate, SubscriptionResolver, UsageCounter};
use crate::application::handlers::{
    CheckAccessHandler, CheckAccessQuery, GetEntitlementsHandler, GetEntitlementsQuery,
};
use crate::domain::foundation::AuthenticatedUser;

use super::dto::{AccessCheckResponse, EntitlementsResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for entitlement endpoints.
#[derive(Clone)]
pub struct EntitlementsAppState {
    pub gate: Arc<PolicyGate>,
    pub resolver: SubscriptionResolver,
    pub usage: UsageCounter,
    pub verbose_errors: bool,
}

impl EntitlementsAppState {
    pub fn get_entitlements_handler(&self) -> GetEntitlementsHandler {
        GetEntitlementsHandler::new(self.resolver.clone(), self.usage.clone())
    }

    pub fn check_access_handler(&self) -> CheckAccessHandler {
        CheckAccessHandler::new(self.gate.clone())
    }

    fn reject(&self, err: impl Into<AccessApiError>) -> AccessApiError {
        err.into().verbose(self.verbose_errors)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/entitlements/me - Tier, bundle, usage and remaining allowance
pub async fn get_my_entitlements(
    State(state): State<EntitlementsAppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, AccessApiError> {
    let query = GetEntitlementsQuery {
        subscriber_id: user.id,
    };

    let result = state
        .get_entitlements_handler()
        .handle(query)
        .await
        .map_err(|e| state.reject(e))?;

    Ok(Json(EntitlementsResponse::from(result)))
}

/// GET /api/entitlements/access/:resource_type - Pre-check a capability
pub async fn check_capability_access(
    State(state): State<EntitlementsAppState>,
    OptionalAuth(user): OptionalAuth,
    Path(resource_type): Path<String>,
) -> Result<impl IntoResponse, AccessApiError> {
    check(state, user, resource_type, None).await
}

/// GET /api/entitlements/access/:resource_type/:resource_id - Pre-check an instance
pub async fn check_resource_access(
    State(state): State<EntitlementsAppState>,
    OptionalAuth(user): OptionalAuth,
    Path((resource_type, resource_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AccessApiError> {
    check(state, user, resource_type, Some(resource_id)).await
}

async fn check(
    state: EntitlementsAppState,
    user: Option<AuthenticatedUser>,
    resource_type: String,
    resource_id: Option<String>,
) -> Result<Json<AccessCheckResponse>, AccessApiError> {
    let query = CheckAccessQuery {
        user,
        resource_type,
        resource_id,
    };

    let result = state
        .check_access_handler()
        .handle(query)
        .await
        .map_err(|e| state.reject(e))?;

    Ok(Json(AccessCheckResponse::from(result)))
}
