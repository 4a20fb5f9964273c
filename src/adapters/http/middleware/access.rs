//! Policy Gate as an axum route layer.
//!
//! `require_access` guards routes for one fixed resource type. For instance
//! types the resource id comes from the `id` path parameter, so the layer must
//! be attached with `route_layer` to see matched path parameters.
//!
//! ```ignore
//! let guard = AccessGuard::new(gate, ResourceType::Course);
//! let courses = Router::new()
//!     .route("/courses/:id", get(show_course))
//!     .route_layer(middleware::from_fn_with_state(guard, require_access));
//! ```
//!
//! On a grant the [`AccessGrant`](crate::application::access::AccessGrant) is
//! stored in request extensions.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::adapters::http::error::AccessApiError;
use crate::application::access::PolicyGate;
use crate::domain::entitlements::{ResourceTarget, ResourceType};
use crate::domain::foundation::{AuthenticatedUser, ResourceId};

/// Path parameter holding the resource id.
pub const RESOURCE_ID_PARAM: &str = "id";

/// State for [`require_access`].
#[derive(Clone)]
pub struct AccessGuard {
    gate: Arc<PolicyGate>,
    resource_type: ResourceType,
    verbose_errors: bool,
}

impl AccessGuard {
    pub fn new(gate: Arc<PolicyGate>, resource_type: ResourceType) -> Self {
        Self {
            gate,
            resource_type,
            verbose_errors: false,
        }
    }

    pub fn with_verbose_errors(mut self, verbose: bool) -> Self {
        self.verbose_errors = verbose;
        self
    }

    fn target(&self, params: Option<&HashMap<String, String>>) -> ResourceTarget {
        if !self.resource_type.requires_instance() {
            return ResourceTarget::capability(self.resource_type);
        }
        let resource_id = params
            .and_then(|p| p.get(RESOURCE_ID_PARAM))
            .and_then(|raw| ResourceId::new(raw.as_str()).ok());
        ResourceTarget {
            resource_type: self.resource_type.into(),
            resource_id,
        }
    }
}

/// Runs the Policy Gate before the handler.
pub async fn require_access(
    State(guard): State<AccessGuard>,
    params: Option<Path<HashMap<String, String>>>,
    mut request: Request,
    next: Next,
) -> Response {
    let target = guard.target(params.as_ref().map(|Path(p)| p));
    let user = request.extensions().get::<AuthenticatedUser>().cloned();

    match guard.gate.authorize(user.as_ref(), &target).await {
        Ok(grant) => {
            request.extensions_mut().insert(grant);
            next.run(request).await
        }
        Err(err) => AccessApiError::from(err)
            .verbose(guard.verbose_errors)
            .into_response(),
    }
}
