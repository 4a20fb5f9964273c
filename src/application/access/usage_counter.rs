//! Usage Counter - point-in-time consumption figures for limit checks.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ResourceId, SubscriberId, Timestamp};
use crate::ports::UsageReader;

/// Counts enrollments, today's completions and test attempts.
///
/// Every method is a fresh read with no caching, so two calls may disagree if
/// a write lands in between.
#[derive(Clone)]
pub struct UsageCounter {
    reader: Arc<dyn UsageReader>,
}

impl UsageCounter {
    pub fn new(reader: Arc<dyn UsageReader>) -> Self {
        Self { reader }
    }

    /// Whether the subscriber is enrolled in `course_id`.
    pub async fn is_enrolled(
        &self,
        subscriber_id: &SubscriberId,
        course_id: &ResourceId,
    ) -> Result<bool, DomainError> {
        self.reader.is_enrolled(subscriber_id, course_id).await
    }

    pub async fn enrolled_count(&self, subscriber_id: &SubscriberId) -> Result<u64, DomainError> {
        self.reader.count_enrollments(subscriber_id).await
    }

    /// Lessons completed since local midnight of the server's current day.
    pub async fn completed_today(&self, subscriber_id: &SubscriberId) -> Result<u64, DomainError> {
        self.completed_on_day_of(subscriber_id, Timestamp::now()).await
    }

    /// Lessons completed since local midnight of the day containing `now`.
    pub async fn completed_on_day_of(
        &self,
        subscriber_id: &SubscriberId,
        now: Timestamp,
    ) -> Result<u64, DomainError> {
        self.reader
            .count_lessons_completed_since(subscriber_id, now.start_of_local_day())
            .await
    }

    pub async fn attempt_count(
        &self,
        subscriber_id: &SubscriberId,
        test_id: &ResourceId,
    ) -> Result<u64, DomainError> {
        self.reader.count_test_attempts(subscriber_id, test_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingUsageReader {
        since: Mutex<Option<Timestamp>>,
    }

    #[async_trait]
    impl UsageReader for RecordingUsageReader {
        async fn is_enrolled(&self, _s: &SubscriberId, _c: &ResourceId) -> Result<bool, DomainError> {
            Ok(true)
        }

        async fn count_enrollments(&self, _s: &SubscriberId) -> Result<u64, DomainError> {
            Ok(4)
        }

        async fn count_lessons_completed_since(
            &self,
            _s: &SubscriberId,
            since: Timestamp,
        ) -> Result<u64, DomainError> {
            *self.since.lock().unwrap() = Some(since);
            Ok(2)
        }

        async fn count_test_attempts(&self, _s: &SubscriberId, _t: &ResourceId) -> Result<u64, DomainError> {
            Ok(1)
        }
    }

    #[tokio::test]
    async fn completed_today_counts_from_local_midnight() {
        let reader = Arc::new(RecordingUsageReader { since: Mutex::new(None) });
        let counter = UsageCounter::new(reader.clone());
        let subscriber = SubscriberId::new("learner-1").unwrap();
        let now = Timestamp::now();

        let count = counter.completed_on_day_of(&subscriber, now).await.unwrap();

        assert_eq!(count, 2);
        let since = reader.since.lock().unwrap().unwrap();
        assert_eq!(since, now.start_of_local_day());
        assert!(!since.is_after(&now));
    }

    #[tokio::test]
    async fn counts_pass_through_the_reader() {
        let counter = UsageCounter::new(Arc::new(RecordingUsageReader { since: Mutex::new(None) }));
        let subscriber = SubscriberId::new("learner-1").unwrap();
        let test_id = ResourceId::new("t-1").unwrap();

        assert_eq!(counter.enrolled_count(&subscriber).await.unwrap(), 4);
        assert_eq!(counter.attempt_count(&subscriber, &test_id).await.unwrap(), 1);
        assert!(counter.is_enrolled(&subscriber, &test_id).await.unwrap());
    }
}
