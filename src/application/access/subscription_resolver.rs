//! Subscription Resolver - maps a subscriber to the tier they are entitled to.
//!
//! Resolution never fails visibly. A missing subscription and a failed store
//! read both resolve to the catalog's default tier, but they stay separate
//! branches of [`SubscriptionLookup`] so callers that must tell them apart can.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::entitlements::{Entitlement, Subscription};
use crate::domain::foundation::{DomainError, SubscriberId, Timestamp};
use crate::ports::SubscriptionReader;

/// Outcome of reading the subscription store.
#[derive(Debug, Clone)]
pub enum SubscriptionLookup {
    Found(Subscription),
    NotFound,
    StoreError(DomainError),
}

impl SubscriptionLookup {
    /// Entitlement implied by this lookup.
    pub fn entitlement(&self) -> Entitlement {
        match self {
            SubscriptionLookup::Found(subscription) => Entitlement::from_subscription(subscription),
            SubscriptionLookup::NotFound => Entitlement::default_tier(),
            SubscriptionLookup::StoreError(_) => Entitlement::default_tier(),
        }
    }
}

/// Resolves subscribers to entitlements. Cheap to clone.
#[derive(Clone)]
pub struct SubscriptionResolver {
    reader: Arc<dyn SubscriptionReader>,
}

impl SubscriptionResolver {
    pub fn new(reader: Arc<dyn SubscriptionReader>) -> Self {
        Self { reader }
    }

    /// Reads the store and classifies the result.
    ///
    /// A record the store returns that is not valid at `now` counts as
    /// `NotFound`.
    pub async fn lookup(&self, subscriber_id: &SubscriberId, now: Timestamp) -> SubscriptionLookup {
        match self.reader.find_active_subscription(subscriber_id, now).await {
            Ok(Some(subscription)) if subscription.is_valid_at(&now) => {
                SubscriptionLookup::Found(subscription)
            }
            Ok(_) => SubscriptionLookup::NotFound,
            Err(err) => SubscriptionLookup::StoreError(err),
        }
    }

    /// Tier and bundle for `subscriber_id` at `now`.
    pub async fn resolve_at(&self, subscriber_id: &SubscriberId, now: Timestamp) -> Entitlement {
        let lookup = self.lookup(subscriber_id, now).await;
        match &lookup {
            SubscriptionLookup::Found(subscription) => {
                debug!(subscriber_id = %subscriber_id, tier = %subscription.tier, "Resolved subscription");
            }
            SubscriptionLookup::NotFound => {
                debug!(subscriber_id = %subscriber_id, "No valid subscription, using default tier");
            }
            SubscriptionLookup::StoreError(err) => {
                warn!(
                    subscriber_id = %subscriber_id,
                    error = %err,
                    "Subscription lookup failed, degrading to default tier"
                );
            }
        }
        lookup.entitlement()
    }

    /// Tier and bundle for `subscriber_id` right now.
    pub async fn resolve(&self, subscriber_id: &SubscriberId) -> Entitlement {
        self.resolve_at(subscriber_id, Timestamp::now()).await
    }
}
