//! Policy Gate - the evaluator wrapped as a request guard.
//!
//! Pipeline, in order:
//!
//! 1. A subscriber identity is required. Without one the request fails as
//!    unauthenticated and nothing else runs.
//! 2. Administrators are granted everything, unconditionally.
//! 3. The subscription resolver yields the tier and bundle.
//! 4. When an ownership checker is installed, an instance resource owned by a
//!    course the subscriber is not enrolled in is denied here. Missing
//!    resources have no owner and fall through.
//! 5. The evaluator decides existence, tier, feature and limit rules.

use std::sync::Arc;

use tracing::{debug, error};

use crate::domain::entitlements::{
    AccessDecision, AccessError, DenialReason, Entitlement, MembershipTier, RequestedType,
    ResourceTarget,
};
use crate::domain::foundation::{AuthenticatedUser, DomainError, SubscriberId};
use crate::ports::{Ownership, OwnershipChecker};

use super::{AccessEvaluator, SubscriptionResolver};

/// Everything the gate learned while deciding.
#[derive(Debug, Clone)]
pub struct GateOutcome {
    pub subscriber_id: SubscriberId,
    pub decision: AccessDecision,
    /// Resolved tier. `None` when the admin bypass skipped resolution.
    pub tier: Option<MembershipTier>,
    pub bypassed: bool,
}

/// Proof that a request passed the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrant {
    pub subscriber_id: SubscriberId,
    pub tier: Option<MembershipTier>,
    pub bypassed: bool,
}

pub struct PolicyGate {
    resolver: SubscriptionResolver,
    evaluator: Arc<dyn AccessEvaluator>,
    ownership: Option<Arc<dyn OwnershipChecker>>,
}

impl PolicyGate {
    pub fn new(resolver: SubscriptionResolver, evaluator: Arc<dyn AccessEvaluator>) -> Self {
        Self {
            resolver,
            evaluator,
            ownership: None,
        }
    }

    /// Adds the ownership stage ahead of the evaluator.
    pub fn with_ownership(mut self, checker: Arc<dyn OwnershipChecker>) -> Self {
        self.ownership = Some(checker);
        self
    }

    /// Runs the pipeline and returns the decision as data.
    ///
    /// Only a missing identity and unexpected store failures are errors.
    pub async fn decide(
        &self,
        user: Option<&AuthenticatedUser>,
        target: &ResourceTarget,
    ) -> Result<GateOutcome, AccessError> {
        let user = user.ok_or(AccessError::Unauthenticated)?;

        if user.is_admin() {
            debug!(subscriber_id = %user.id, resource_type = %target.resource_type, "Admin bypass");
            return Ok(GateOutcome {
                subscriber_id: user.id.clone(),
                decision: AccessDecision::grant(),
                tier: None,
                bypassed: true,
            });
        }

        let entitlement = self.resolver.resolve(&user.id).await;
        let decision = self
            .run_stages(&user.id, target, &entitlement)
            .await
            .map_err(|err| {
                error!(
                    subscriber_id = %user.id,
                    resource_type = %target.resource_type,
                    error = %err,
                    "Access evaluation failed"
                );
                AccessError::from(err)
            })?;

        Ok(GateOutcome {
            subscriber_id: user.id.clone(),
            decision,
            tier: Some(entitlement.tier),
            bypassed: false,
        })
    }

    /// Runs the pipeline and fails the request on anything but a grant.
    pub async fn authorize(
        &self,
        user: Option<&AuthenticatedUser>,
        target: &ResourceTarget,
    ) -> Result<AccessGrant, AccessError> {
        let outcome = self.decide(user, target).await?;
        AccessError::check(outcome.decision, target)?;
        Ok(AccessGrant {
            subscriber_id: outcome.subscriber_id,
            tier: outcome.tier,
            bypassed: outcome.bypassed,
        })
    }

    async fn run_stages(
        &self,
        subscriber_id: &SubscriberId,
        target: &ResourceTarget,
        entitlement: &Entitlement,
    ) -> Result<AccessDecision, DomainError> {
        let resource_type = match &target.resource_type {
            RequestedType::Known(resource_type) => *resource_type,
            RequestedType::Unknown(name) => {
                return Ok(AccessDecision::deny(
                    DenialReason::UnknownResourceType { name: name.clone() },
                    None,
                    entitlement.tier,
                ));
            }
        };

        if let (Some(checker), Some(resource_id)) = (&self.ownership, &target.resource_id) {
            let ownership = checker
                .check_ownership(subscriber_id, resource_type, resource_id)
                .await?;
            if ownership == Ownership::NotOwner {
                debug!(
                    subscriber_id = %subscriber_id,
                    resource_type = %resource_type,
                    resource_id = %resource_id,
                    "Not enrolled in owning course"
                );
                return Ok(AccessDecision::deny(
                    DenialReason::NotEnrolled,
                    None,
                    entitlement.tier,
                ));
            }
        }

        self.evaluator
            .evaluate(resource_type, target.resource_id.as_ref(), subscriber_id, entitlement)
            .await
    }
}
