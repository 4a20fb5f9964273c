//! Ownership checker port.
//!
//! Answers whether a subscriber is enrolled in the lesson or course that owns
//! a resource. Runs as its own stage before the tier evaluator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entitlements::ResourceType;
use crate::domain::foundation::{DomainError, ResourceId, SubscriberId};

/// Result of an ownership lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ownership {
    /// Subscriber is enrolled in the owning course.
    Owner,
    /// Resource belongs to a course the subscriber is not enrolled in.
    NotOwner,
    /// No owner applies: capabilities, courses, standalone items, and ids
    /// that do not exist (the evaluator reports those as not found).
    NotApplicable,
}

#[async_trait]
pub trait OwnershipChecker: Send + Sync {
    async fn check_ownership(
        &self,
        subscriber_id: &SubscriberId,
        resource_type: ResourceType,
        resource_id: &ResourceId,
    ) -> Result<Ownership, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ownership_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Ownership::NotApplicable).unwrap(),
            "\"not_applicable\""
        );
    }
}
