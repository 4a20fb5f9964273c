//! In-memory entitlement store.
//!
//! Implements every read port the access engine needs over plain collections.
//! Useful for:
//! - Unit and integration tests
//! - Local development without PostgreSQL
//!
//! Soft-deleted records are kept and filtered, the way the database adapter
//! filters on `deleted_at IS NULL`.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::entitlements::{ResourceType, Subscription};
use crate::domain::foundation::{DomainError, ResourceId, SubscriberId, Timestamp};
use crate::ports::{
    CourseInfo, LessonInfo, Ownership, OwnershipChecker, ResourceCatalog, SubscriptionReader,
    UsageReader,
};

#[derive(Debug, Clone)]
struct CourseRecord {
    premium: bool,
    deleted: bool,
}

#[derive(Debug, Clone)]
struct LessonRecord {
    course_id: ResourceId,
    deleted: bool,
}

/// Test, exercise, grammar or vocabulary item, optionally attached to a lesson.
#[derive(Debug, Clone)]
struct ItemRecord {
    lesson_id: Option<ResourceId>,
    deleted: bool,
}

#[derive(Debug, Clone)]
struct Enrollment {
    subscriber_id: SubscriberId,
    course_id: ResourceId,
    deleted: bool,
}

#[derive(Debug, Clone)]
struct Completion {
    subscriber_id: SubscriberId,
    completed_at: Timestamp,
}

#[derive(Debug, Clone)]
struct Attempt {
    subscriber_id: SubscriberId,
    test_id: ResourceId,
    deleted: bool,
}

#[derive(Debug, Default)]
struct StoreState {
    subscriptions: Vec<Subscription>,
    courses: HashMap<ResourceId, CourseRecord>,
    lessons: HashMap<ResourceId, LessonRecord>,
    items: HashMap<(ResourceType, ResourceId), ItemRecord>,
    enrollments: Vec<Enrollment>,
    completions: Vec<Completion>,
    attempts: Vec<Attempt>,
    fail_subscriptions: bool,
}

impl StoreState {
    fn item(&self, resource_type: ResourceType, id: &ResourceId) -> Option<&ItemRecord> {
        self.items
            .get(&(resource_type, id.clone()))
            .filter(|item| !item.deleted)
    }

    fn is_enrolled(&self, subscriber_id: &SubscriberId, course_id: &ResourceId) -> bool {
        self.enrollments
            .iter()
            .any(|e| !e.deleted && &e.subscriber_id == subscriber_id && &e.course_id == course_id)
    }

    fn course_of_lesson(&self, lesson_id: &ResourceId) -> Option<&ResourceId> {
        self.lessons
            .get(lesson_id)
            .filter(|lesson| !lesson.deleted)
            .map(|lesson| &lesson.course_id)
    }
}

/// In-memory implementation of the store ports.
///
/// Builder methods (`with_*`) seed data before the store is shared; the
/// async methods mutate it afterwards.
///
/// # Example
///
/// ```ignore
/// let store = InMemoryEntitlementStore::new()
///     .with_course("c-1", false)
///     .with_lesson("l-1", "c-1")
///     .with_enrollment("learner-1", "c-1");
/// ```
#[derive(Debug, Default)]
pub struct InMemoryEntitlementStore {
    state: RwLock<StoreState>,
}

/// Builder helpers panic on blank ids; seeds are fixed strings.
fn rid(raw: &str) -> ResourceId {
    ResourceId::new(raw).expect("seeded resource id must not be blank")
}

fn sid(raw: &str) -> SubscriberId {
    SubscriberId::new(raw).expect("seeded subscriber id must not be blank")
}

impl InMemoryEntitlementStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ────────────────────────────────────────────────────────────────────────
    // Seeding
    // ────────────────────────────────────────────────────────────────────────

    pub fn with_subscription(mut self, subscription: Subscription) -> Self {
        self.state.get_mut().subscriptions.push(subscription);
        self
    }

    pub fn with_course(mut self, id: &str, premium: bool) -> Self {
        self.state.get_mut().courses.insert(
            rid(id),
            CourseRecord {
                premium,
                deleted: false,
            },
        );
        self
    }

    pub fn with_lesson(mut self, id: &str, course_id: &str) -> Self {
        self.state.get_mut().lessons.insert(
            rid(id),
            LessonRecord {
                course_id: rid(course_id),
                deleted: false,
            },
        );
        self
    }

    /// Adds a test, exercise, grammar or vocabulary item owned by `lesson_id`.
    pub fn with_item(mut self, resource_type: ResourceType, id: &str, lesson_id: Option<&str>) -> Self {
        self.state.get_mut().items.insert(
            (resource_type, rid(id)),
            ItemRecord {
                lesson_id: lesson_id.map(rid),
                deleted: false,
            },
        );
        self
    }

    pub fn with_enrollment(mut self, subscriber_id: &str, course_id: &str) -> Self {
        self.state.get_mut().enrollments.push(Enrollment {
            subscriber_id: sid(subscriber_id),
            course_id: rid(course_id),
            deleted: false,
        });
        self
    }

    /// Adds `count` enrollments in distinct placeholder courses.
    pub fn with_enrollments(mut self, subscriber_id: &str, count: usize) -> Self {
        let state = self.state.get_mut();
        for n in 0..count {
            state.enrollments.push(Enrollment {
                subscriber_id: sid(subscriber_id),
                course_id: rid(&format!("seed-course-{}", n)),
                deleted: false,
            });
        }
        self
    }

    pub fn with_completion(mut self, subscriber_id: &str, completed_at: Timestamp) -> Self {
        self.state.get_mut().completions.push(Completion {
            subscriber_id: sid(subscriber_id),
            completed_at,
        });
        self
    }

    pub fn with_attempt(mut self, subscriber_id: &str, test_id: &str) -> Self {
        self.state.get_mut().attempts.push(Attempt {
            subscriber_id: sid(subscriber_id),
            test_id: rid(test_id),
            deleted: false,
        });
        self
    }

    /// Makes every subscription lookup fail with a database error.
    pub fn failing_subscriptions(mut self) -> Self {
        self.state.get_mut().fail_subscriptions = true;
        self
    }

    // ────────────────────────────────────────────────────────────────────────
    // Runtime mutation
    // ────────────────────────────────────────────────────────────────────────

    pub async fn add_subscription(&self, subscription: Subscription) {
        self.state.write().await.subscriptions.push(subscription);
    }

    pub async fn enroll(&self, subscriber_id: &SubscriberId, course_id: &ResourceId) {
        self.state.write().await.enrollments.push(Enrollment {
            subscriber_id: subscriber_id.clone(),
            course_id: course_id.clone(),
            deleted: false,
        });
    }

    pub async fn complete_lesson(&self, subscriber_id: &SubscriberId, completed_at: Timestamp) {
        self.state.write().await.completions.push(Completion {
            subscriber_id: subscriber_id.clone(),
            completed_at,
        });
    }

    pub async fn record_attempt(&self, subscriber_id: &SubscriberId, test_id: &ResourceId) {
        self.state.write().await.attempts.push(Attempt {
            subscriber_id: subscriber_id.clone(),
            test_id: test_id.clone(),
            deleted: false,
        });
    }

    /// Soft-deletes a course. Lessons under it stay but their course is gone.
    pub async fn delete_course(&self, course_id: &ResourceId) {
        if let Some(course) = self.state.write().await.courses.get_mut(course_id) {
            course.deleted = true;
        }
    }

    /// Soft-deletes every enrollment of the subscriber in the course.
    pub async fn withdraw(&self, subscriber_id: &SubscriberId, course_id: &ResourceId) {
        let mut state = self.state.write().await;
        state
            .enrollments
            .iter_mut()
            .filter(|e| &e.subscriber_id == subscriber_id && &e.course_id == course_id)
            .for_each(|e| e.deleted = true);
    }

    /// Soft-deletes every attempt of the subscriber on the test.
    pub async fn reset_attempts(&self, subscriber_id: &SubscriberId, test_id: &ResourceId) {
        let mut state = self.state.write().await;
        state
            .attempts
            .iter_mut()
            .filter(|a| &a.subscriber_id == subscriber_id && &a.test_id == test_id)
            .for_each(|a| a.deleted = true);
    }
}

#[async_trait]
impl SubscriptionReader for InMemoryEntitlementStore {
    async fn find_active_subscription(
        &self,
        subscriber_id: &SubscriberId,
        now: Timestamp,
    ) -> Result<Option<Subscription>, DomainError> {
        let state = self.state.read().await;
        if state.fail_subscriptions {
            return Err(DomainError::database("subscription store unavailable"));
        }
        Ok(state
            .subscriptions
            .iter()
            .filter(|s| &s.subscriber_id == subscriber_id && s.is_valid_at(&now))
            .max_by_key(|s| s.end_date)
            .cloned())
    }
}

#[async_trait]
impl ResourceCatalog for InMemoryEntitlementStore {
    async fn find_course(&self, id: &ResourceId) -> Result<Option<CourseInfo>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .courses
            .get(id)
            .filter(|course| !course.deleted)
            .map(|course| CourseInfo {
                id: id.clone(),
                premium: course.premium,
            }))
    }

    async fn find_lesson(&self, id: &ResourceId) -> Result<Option<LessonInfo>, DomainError> {
        let state = self.state.read().await;
        Ok(state.course_of_lesson(id).map(|course_id| LessonInfo {
            id: id.clone(),
            course_id: course_id.clone(),
        }))
    }

    async fn test_exists(&self, id: &ResourceId) -> Result<bool, DomainError> {
        Ok(self.state.read().await.item(ResourceType::Test, id).is_some())
    }

    async fn exercise_exists(&self, id: &ResourceId) -> Result<bool, DomainError> {
        Ok(self.state.read().await.item(ResourceType::Exercise, id).is_some())
    }

    async fn grammar_exists(&self, id: &ResourceId) -> Result<bool, DomainError> {
        Ok(self.state.read().await.item(ResourceType::Grammar, id).is_some())
    }

    async fn vocabulary_exists(&self, id: &ResourceId) -> Result<bool, DomainError> {
        Ok(self.state.read().await.item(ResourceType::Vocabulary, id).is_some())
    }
}

#[async_trait]
impl UsageReader for InMemoryEntitlementStore {
    async fn is_enrolled(
        &self,
        subscriber_id: &SubscriberId,
        course_id: &ResourceId,
    ) -> Result<bool, DomainError> {
        Ok(self.state.read().await.is_enrolled(subscriber_id, course_id))
    }

    async fn count_enrollments(&self, subscriber_id: &SubscriberId) -> Result<u64, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .enrollments
            .iter()
            .filter(|e| !e.deleted && &e.subscriber_id == subscriber_id)
            .count() as u64)
    }

    async fn count_lessons_completed_since(
        &self,
        subscriber_id: &SubscriberId,
        since: Timestamp,
    ) -> Result<u64, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .completions
            .iter()
            .filter(|c| &c.subscriber_id == subscriber_id && !c.completed_at.is_before(&since))
            .count() as u64)
    }

    async fn count_test_attempts(
        &self,
        subscriber_id: &SubscriberId,
        test_id: &ResourceId,
    ) -> Result<u64, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .attempts
            .iter()
            .filter(|a| !a.deleted && &a.subscriber_id == subscriber_id && &a.test_id == test_id)
            .count() as u64)
    }
}

#[async_trait]
impl OwnershipChecker for InMemoryEntitlementStore {
    async fn check_ownership(
        &self,
        subscriber_id: &SubscriberId,
        resource_type: ResourceType,
        resource_id: &ResourceId,
    ) -> Result<Ownership, DomainError> {
        let state = self.state.read().await;

        let lesson_id = match resource_type {
            ResourceType::Lesson => Some(resource_id.clone()),
            ResourceType::Test
            | ResourceType::Exercise
            | ResourceType::Grammar
            | ResourceType::Vocabulary => state
                .item(resource_type, resource_id)
                .and_then(|item| item.lesson_id.clone()),
            _ => None,
        };
        let Some(lesson_id) = lesson_id else {
            return Ok(Ownership::NotApplicable);
        };

        Ok(match state.course_of_lesson(&lesson_id) {
            Some(course_id) if state.is_enrolled(subscriber_id, course_id) => Ownership::Owner,
            Some(_) => Ownership::NotOwner,
            None => Ownership::NotApplicable,
        })
    }
}
