//! GetEntitlementsHandler - Query handler for a subscriber's entitlement summary.

use serde::Serialize;

use crate::application::access::{SubscriptionResolver, UsageCounter};
use crate::domain::entitlements::{FeatureBundle, MembershipTier, TierCatalog};
use crate::domain::foundation::{DomainError, SubscriberId};

/// Query for the current subscriber's entitlements.
#[derive(Debug, Clone)]
pub struct GetEntitlementsQuery {
    pub subscriber_id: SubscriberId,
}

/// Consumption counted against the bundle's limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageSnapshot {
    pub enrolled_courses: u64,
    pub lessons_completed_today: u64,
}

/// Units left before a limit denies. `None` means unlimited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemainingAllowance {
    pub courses: Option<u64>,
    pub lessons_today: Option<u64>,
}

/// Result of an entitlement query.
#[derive(Debug, Clone, Serialize)]
pub struct GetEntitlementsResult {
    pub tier: MembershipTier,
    pub plan_name: &'static str,
    pub features: FeatureBundle,
    pub usage: UsageSnapshot,
    pub remaining: RemainingAllowance,
}

/// Handler for the entitlement summary.
///
/// Lets clients show limits before a subscriber runs into them.
pub struct GetEntitlementsHandler {
    resolver: SubscriptionResolver,
    usage: UsageCounter,
}

impl GetEntitlementsHandler {
    pub fn new(resolver: SubscriptionResolver, usage: UsageCounter) -> Self {
        Self { resolver, usage }
    }

    pub async fn handle(&self, query: GetEntitlementsQuery) -> Result<GetEntitlementsResult, DomainError> {
        let entitlement = self.resolver.resolve(&query.subscriber_id).await;
        let enrolled_courses = self.usage.enrolled_count(&query.subscriber_id).await?;
        let lessons_completed_today = self.usage.completed_today(&query.subscriber_id).await?;

        let features = entitlement.features;
        let remaining = RemainingAllowance {
            courses: features.max_courses.remaining(enrolled_courses),
            lessons_today: features.max_lessons_per_day.remaining(lessons_completed_today),
        };

        Ok(GetEntitlementsResult {
            tier: entitlement.tier,
            plan_name: TierCatalog::global().plan_of(entitlement.tier).display_name,
            features,
            usage: UsageSnapshot {
                enrolled_courses,
                lessons_completed_today,
            },
            remaining,
        })
    }
}
