//! Subscription reader port.
//!
//! Read side of the subscription store. The engine never writes
//! subscriptions; purchases and renewals belong to billing.

use async_trait::async_trait;

use crate::domain::entitlements::Subscription;
use crate::domain::foundation::{DomainError, SubscriberId, Timestamp};

/// Reader port for subscription lookups.
#[async_trait]
pub trait SubscriptionReader: Send + Sync {
    /// Find a subscription for `subscriber_id` that is active, not expired at
    /// `now` and not soft-deleted.
    ///
    /// Returns `Ok(None)` when there is none. Since uniqueness is not enforced,
    /// implementations return the one with the latest `end_date` when several
    /// qualify.
    async fn find_active_subscription(
        &self,
        subscriber_id: &SubscriberId,
        now: Timestamp,
    ) -> Result<Option<Subscription>, DomainError>;
}
