//! Subscription entity.
//!
//! A subscription ties a subscriber to a tier for a period of time and keeps
//! a snapshot of the tier's feature bundle taken at purchase.
//!
//! # Design Decisions
//!
//! - **Validity is computed**: there is no status column. A subscription is
//!   valid while `is_active`, not past `end_date` and not soft-deleted.
//! - **Snapshot bundle**: later catalog edits do not change what an existing
//!   subscriber paid for.
//! - **No uniqueness**: several records may exist per subscriber; readers pick
//!   a valid one.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SubscriberId, SubscriptionId, Timestamp};

use super::{FeatureBundle, MembershipTier, TierCatalog};

/// Informational usage counters carried on a subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    pub courses_enrolled: u32,
    pub lessons_completed: u32,
    pub tests_taken: u32,
    pub ai_messages: u32,
}

/// A subscriber's purchased tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub subscriber_id: SubscriberId,
    pub tier: MembershipTier,
    pub features: FeatureBundle,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub is_active: bool,
    pub auto_renew: bool,
    pub usage: UsageStats,
    pub deleted_at: Option<Timestamp>,
}

impl Subscription {
    /// Creates an active subscription for `tier` starting at `now`, with the
    /// catalog's current bundle snapshotted.
    pub fn purchase(subscriber_id: SubscriberId, tier: MembershipTier, now: Timestamp) -> Self {
        let plan = TierCatalog::global().plan_of(tier);
        Self {
            id: SubscriptionId::new(),
            subscriber_id,
            tier,
            features: plan.features.clone(),
            start_date: now,
            end_date: now.add_days(i64::from(plan.duration_days)),
            is_active: true,
            auto_renew: false,
            usage: UsageStats::default(),
            deleted_at: None,
        }
    }

    /// Returns true if this subscription grants its tier at `now`.
    pub fn is_valid_at(&self, now: &Timestamp) -> bool {
        self.is_active && !self.end_date.is_before(now) && self.deleted_at.is_none()
    }

    /// Whether the end date has passed at `now`.
    pub fn is_expired_at(&self, now: &Timestamp) -> bool {
        self.end_date.is_before(now)
    }

    /// Explicitly switches the subscription off.
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    /// Marks the record as deleted without removing it.
    pub fn soft_delete(&mut self, now: Timestamp) {
        self.deleted_at = Some(now);
    }

    /// Replaces the end date, e.g. when a renewal or admin correction lands.
    pub fn with_end_date(mut self, end_date: Timestamp) -> Self {
        self.end_date = end_date;
        self
    }

    /// Replaces the snapshot bundle.
    pub fn with_features(mut self, features: FeatureBundle) -> Self {
        self.features = features;
        self
    }
}
