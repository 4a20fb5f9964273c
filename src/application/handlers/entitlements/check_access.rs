//! CheckAccessHandler - Query handler that pre-checks access to a resource.
//!
//! Runs the Policy Gate but returns the decision as data, so a client can
//! grey out a button instead of discovering the denial on click.

use std::sync::Arc;

use crate::application::access::PolicyGate;
use crate::domain::entitlements::{AccessDecision, AccessError, MembershipTier, RequestedType, ResourceTarget};
use crate::domain::foundation::{AuthenticatedUser, ResourceId};

/// Query to check access to a resource.
#[derive(Debug, Clone)]
pub struct CheckAccessQuery {
    pub user: Option<AuthenticatedUser>,
    /// Resource type as named by the caller.
    pub resource_type: String,
    pub resource_id: Option<String>,
}

/// Result of an access check.
#[derive(Debug, Clone)]
pub struct CheckAccessResult {
    pub target: ResourceTarget,
    pub decision: AccessDecision,
    pub tier: Option<MembershipTier>,
    pub bypassed: bool,
}

/// Handler for access pre-checks.
pub struct CheckAccessHandler {
    gate: Arc<PolicyGate>,
}

impl CheckAccessHandler {
    pub fn new(gate: Arc<PolicyGate>) -> Self {
        Self { gate }
    }

    /// Fails only when unauthenticated or on store errors. A not-found
    /// resource is reported through the decision.
    pub async fn handle(&self, query: CheckAccessQuery) -> Result<CheckAccessResult, AccessError> {
        let target = Self::target(&query);
        let outcome = self.gate.decide(query.user.as_ref(), &target).await?;

        Ok(CheckAccessResult {
            target,
            decision: outcome.decision,
            tier: outcome.tier,
            bypassed: outcome.bypassed,
        })
    }

    /// Capability types drop any id; blank ids count as absent.
    fn target(query: &CheckAccessQuery) -> ResourceTarget {
        let resource_type = RequestedType::parse(&query.resource_type);
        let wants_id = match &resource_type {
            RequestedType::Known(known) => known.requires_instance(),
            RequestedType::Unknown(_) => true,
        };
        let resource_id = query
            .resource_id
            .as_deref()
            .filter(|_| wants_id)
            .and_then(|raw| ResourceId::new(raw).ok());

        ResourceTarget {
            resource_type,
            resource_id,
        }
    }
}
