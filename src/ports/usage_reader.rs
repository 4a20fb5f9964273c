//! Usage reader port.
//!
//! Point-in-time counts over enrollment, completion and attempt records.
//! Every method is a read; nothing here mutates a counter.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ResourceId, SubscriberId, Timestamp};

#[async_trait]
pub trait UsageReader: Send + Sync {
    /// Whether the subscriber holds a non-deleted enrollment in the course.
    async fn is_enrolled(
        &self,
        subscriber_id: &SubscriberId,
        course_id: &ResourceId,
    ) -> Result<bool, DomainError>;

    /// Non-deleted enrollments across all courses.
    async fn count_enrollments(&self, subscriber_id: &SubscriberId) -> Result<u64, DomainError>;

    /// Lesson completions at or after `since`.
    async fn count_lessons_completed_since(
        &self,
        subscriber_id: &SubscriberId,
        since: Timestamp,
    ) -> Result<u64, DomainError>;

    /// Non-deleted attempts on one test.
    async fn count_test_attempts(
        &self,
        subscriber_id: &SubscriberId,
        test_id: &ResourceId,
    ) -> Result<u64, DomainError>;
}
