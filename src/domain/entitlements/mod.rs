//! Entitlements module - tiers, feature bundles, subscriptions and access decisions.
//!
//! # Module Organization
//!
//! - `tier` - Closed set of membership tiers
//! - `limit` - Numeric bound with an explicit unlimited case
//! - `features` - Feature flags and the per-tier bundle
//! - `catalog` - Static tier catalog
//! - `subscription` - Purchased subscription entity
//! - `resource` - Resource types and request targets
//! - `decision` - Evaluator output
//! - `errors` - Boundary failures

mod catalog;
mod decision;
mod errors;
mod features;
pub mod limit;
mod resource;
mod subscription;
mod tier;

pub use catalog::{TierCatalog, TierPlan};
pub use decision::{AccessDecision, DenialReason};
pub use errors::{AccessError, PolicyDenial};
pub use features::{Feature, FeatureBundle};
pub use limit::Limit;
pub use resource::{RequestedType, ResourceTarget, ResourceType};
pub use subscription::{Subscription, UsageStats};
pub use tier::MembershipTier;

/// Tier and bundle a subscriber is currently entitled to.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Entitlement {
    pub tier: MembershipTier,
    pub features: FeatureBundle,
}

impl Entitlement {
    /// The catalog's default tier with its bundle.
    pub fn default_tier() -> Self {
        let (tier, features) = TierCatalog::global().default_entitlement();
        Self { tier, features }
    }

    /// Entitlement granted by a valid subscription's snapshot.
    pub fn from_subscription(subscription: &Subscription) -> Self {
        Self {
            tier: subscription.tier,
            features: subscription.features.clone(),
        }
    }
}
