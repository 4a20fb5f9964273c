//! Resource Access Evaluator - the decision core.
//!
//! Given a resource type, an optional resource id, the subscriber and their
//! resolved entitlement, returns an [`AccessDecision`]. Denials and missing
//! resources are decisions; only store failures come back as errors.
//!
//! # Rules
//!
//! | Type | Rule | Suggested tier |
//! |------|------|----------------|
//! | Course | exists, then enrolled grants, then premium flag, then course limit | Premium / Pro |
//! | Lesson | parent course rule, then daily lesson limit | Premium |
//! | Test | exists, then retake limit | Pro |
//! | Exercise, Grammar, Vocabulary | exists | - |
//! | AI chat, Flashcard, Certificate, Analytics, Study plan | feature flag | Premium |
//! | Live tutoring | feature flag | Pro |

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::entitlements::{
    AccessDecision, DenialReason, Entitlement, Feature, MembershipTier, ResourceType,
};
use crate::domain::foundation::{DomainError, ResourceId, SubscriberId};
use crate::ports::ResourceCatalog;

use super::UsageCounter;

/// Decides whether an identified subscriber may reach a resource.
#[async_trait]
pub trait AccessEvaluator: Send + Sync {
    async fn evaluate(
        &self,
        resource_type: ResourceType,
        resource_id: Option<&ResourceId>,
        subscriber_id: &SubscriberId,
        entitlement: &Entitlement,
    ) -> Result<AccessDecision, DomainError>;
}

/// Tier, feature and limit rules backed by the resource catalog and usage counts.
pub struct ResourceAccessEvaluator {
    catalog: Arc<dyn ResourceCatalog>,
    usage: UsageCounter,
}

impl ResourceAccessEvaluator {
    pub fn new(catalog: Arc<dyn ResourceCatalog>, usage: UsageCounter) -> Self {
        Self { catalog, usage }
    }

    async fn evaluate_course(
        &self,
        course_id: &ResourceId,
        subscriber_id: &SubscriberId,
        entitlement: &Entitlement,
    ) -> Result<AccessDecision, DomainError> {
        let Some(course) = self.catalog.find_course(course_id).await? else {
            return Ok(AccessDecision::not_found());
        };

        // Enrollment is never revoked by a later downgrade or tighter limit.
        if self.usage.is_enrolled(subscriber_id, &course.id).await? {
            return Ok(AccessDecision::grant());
        }

        if course.premium && !entitlement.features.premium_courses {
            return Ok(AccessDecision::deny(
                DenialReason::RequiresHigherTier,
                Some(MembershipTier::Premium),
                entitlement.tier,
            ));
        }

        let limit = entitlement.features.max_courses;
        if let Some(max) = limit.max() {
            let enrolled = self.usage.enrolled_count(subscriber_id).await?;
            if limit.is_reached(enrolled) {
                return Ok(AccessDecision::deny(
                    DenialReason::CourseLimitReached { current: enrolled, max },
                    Some(MembershipTier::Pro),
                    entitlement.tier,
                ));
            }
        }

        Ok(AccessDecision::grant())
    }

    async fn evaluate_lesson(
        &self,
        lesson_id: &ResourceId,
        subscriber_id: &SubscriberId,
        entitlement: &Entitlement,
    ) -> Result<AccessDecision, DomainError> {
        let Some(lesson) = self.catalog.find_lesson(lesson_id).await? else {
            return Ok(AccessDecision::not_found());
        };

        let course_decision = self
            .evaluate_course(&lesson.course_id, subscriber_id, entitlement)
            .await?;
        if !course_decision.is_granted() {
            return Ok(course_decision);
        }

        let limit = entitlement.features.max_lessons_per_day;
        if let Some(max) = limit.max() {
            let completed = self.usage.completed_today(subscriber_id).await?;
            if limit.is_reached(completed) {
                return Ok(AccessDecision::deny(
                    DenialReason::DailyLessonLimitReached { current: completed, max },
                    Some(MembershipTier::Premium),
                    entitlement.tier,
                ));
            }
        }

        Ok(AccessDecision::grant())
    }

    async fn evaluate_test(
        &self,
        test_id: &ResourceId,
        subscriber_id: &SubscriberId,
        entitlement: &Entitlement,
    ) -> Result<AccessDecision, DomainError> {
        if !self.catalog.test_exists(test_id).await? {
            return Ok(AccessDecision::not_found());
        }

        let limit = entitlement.features.test_retakes;
        if let Some(max) = limit.max() {
            let attempts = self.usage.attempt_count(subscriber_id, test_id).await?;
            if limit.is_reached(attempts) {
                return Ok(AccessDecision::deny(
                    DenialReason::RetakeLimitReached { current: attempts, max },
                    Some(MembershipTier::Pro),
                    entitlement.tier,
                ));
            }
        }

        Ok(AccessDecision::grant())
    }

    fn existence(exists: bool) -> AccessDecision {
        if exists {
            AccessDecision::grant()
        } else {
            AccessDecision::not_found()
        }
    }

    fn feature_gate(
        feature: Feature,
        required_tier: MembershipTier,
        entitlement: &Entitlement,
    ) -> AccessDecision {
        if entitlement.features.has(feature) {
            AccessDecision::grant()
        } else {
            AccessDecision::deny(
                DenialReason::FeatureNotIncluded { feature },
                Some(required_tier),
                entitlement.tier,
            )
        }
    }
}

#[async_trait]
impl AccessEvaluator for ResourceAccessEvaluator {
    async fn evaluate(
        &self,
        resource_type: ResourceType,
        resource_id: Option<&ResourceId>,
        subscriber_id: &SubscriberId,
        entitlement: &Entitlement,
    ) -> Result<AccessDecision, DomainError> {
        use ResourceType::*;

        let decision = match (resource_type, resource_id) {
            (AiChat, _) => Self::feature_gate(Feature::AiChatAccess, MembershipTier::Premium, entitlement),
            (Flashcard, _) => {
                Self::feature_gate(Feature::FlashcardsUnlimited, MembershipTier::Premium, entitlement)
            }
            (Certificate, _) => {
                Self::feature_gate(Feature::Certification, MembershipTier::Premium, entitlement)
            }
            (Analytics, _) => {
                Self::feature_gate(Feature::AdvancedAnalytics, MembershipTier::Premium, entitlement)
            }
            (StudyPlan, _) => {
                Self::feature_gate(Feature::CustomStudyPlans, MembershipTier::Premium, entitlement)
            }
            (LiveTutoring, _) => Self::feature_gate(Feature::LiveTutoring, MembershipTier::Pro, entitlement),
            // An instance resource without an id cannot exist.
            (_, None) => AccessDecision::not_found(),
            (Course, Some(id)) => self.evaluate_course(id, subscriber_id, entitlement).await?,
            (Lesson, Some(id)) => self.evaluate_lesson(id, subscriber_id, entitlement).await?,
            (Test, Some(id)) => self.evaluate_test(id, subscriber_id, entitlement).await?,
            (Exercise, Some(id)) => Self::existence(self.catalog.exercise_exists(id).await?),
            (Grammar, Some(id)) => Self::existence(self.catalog.grammar_exists(id).await?),
            (Vocabulary, Some(id)) => Self::existence(self.catalog.vocabulary_exists(id).await?),
        };

        let reason = decision.reason();
        debug!(
            subscriber_id = %subscriber_id,
            resource_type = %resource_type,
            tier = %entitlement.tier,
            granted = decision.is_granted(),
            reason = reason.as_deref().unwrap_or("-"),
            "Evaluated access"
        );

        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entitlements::TierCatalog;
    use crate::domain::foundation::Timestamp;
    use crate::ports::{CourseInfo, LessonInfo, UsageReader};
    use std::collections::{HashMap, HashSet};

    // ════════════════════════════════════════════════════════════════════════════
    // Fake Stores
    // ════════════════════════════════════════════════════════════════════════════

    #[derive(Default)]
    struct FakeStore {
        courses: HashMap<String, bool>,
        lessons: HashMap<String, String>,
        tests: HashSet<String>,
        exercises: HashSet<String>,
        enrolled_in: HashSet<String>,
        enrollment_count: u64,
        completed_today: u64,
        attempts: u64,
    }

    fn id(raw: &str) -> ResourceId {
        ResourceId::new(raw).unwrap()
    }

    #[async_trait]
    impl ResourceCatalog for FakeStore {
        async fn find_course(&self, course_id: &ResourceId) -> Result<Option<CourseInfo>, DomainError> {
            Ok(self.courses.get(course_id.as_str()).map(|premium| CourseInfo {
                id: course_id.clone(),
                premium: *premium,
            }))
        }

        async fn find_lesson(&self, lesson_id: &ResourceId) -> Result<Option<LessonInfo>, DomainError> {
            Ok(self.lessons.get(lesson_id.as_str()).map(|course| LessonInfo {
                id: lesson_id.clone(),
                course_id: id(course),
            }))
        }

        async fn test_exists(&self, test_id: &ResourceId) -> Result<bool, DomainError> {
            Ok(self.tests.contains(test_id.as_str()))
        }

        async fn exercise_exists(&self, exercise_id: &ResourceId) -> Result<bool, DomainError> {
            Ok(self.exercises.contains(exercise_id.as_str()))
        }

        async fn grammar_exists(&self, _id: &ResourceId) -> Result<bool, DomainError> {
            Ok(false)
        }

        async fn vocabulary_exists(&self, _id: &ResourceId) -> Result<bool, DomainError> {
            Err(DomainError::database("vocabulary store offline"))
        }
    }

    #[async_trait]
    impl UsageReader for FakeStore {
        async fn is_enrolled(&self, _s: &SubscriberId, course_id: &ResourceId) -> Result<bool, DomainError> {
            Ok(self.enrolled_in.contains(course_id.as_str()))
        }

        async fn count_enrollments(&self, _s: &SubscriberId) -> Result<u64, DomainError> {
            Ok(self.enrollment_count)
        }

        async fn count_lessons_completed_since(
            &self,
            _s: &SubscriberId,
            _since: Timestamp,
        ) -> Result<u64, DomainError> {
            Ok(self.completed_today)
        }

        async fn count_test_attempts(&self, _s: &SubscriberId, _t: &ResourceId) -> Result<u64, DomainError> {
            Ok(self.attempts)
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn evaluator(store: FakeStore) -> ResourceAccessEvaluator {
        let store = Arc::new(store);
        ResourceAccessEvaluator::new(store.clone(), UsageCounter::new(store))
    }

    fn entitlement(tier: MembershipTier) -> Entitlement {
        Entitlement {
            tier,
            features: TierCatalog::global().features_of(tier).clone(),
        }
    }

    fn subscriber() -> SubscriberId {
        SubscriberId::new("learner-1").unwrap()
    }

    async fn evaluate(
        store: FakeStore,
        resource_type: ResourceType,
        resource_id: Option<&str>,
        tier: MembershipTier,
    ) -> AccessDecision {
        let resource_id = resource_id.map(id);
        evaluator(store)
            .evaluate(resource_type, resource_id.as_ref(), &subscriber(), &entitlement(tier))
            .await
            .unwrap()
    }

    fn store_with_course(premium: bool) -> FakeStore {
        let mut store = FakeStore::default();
        store.courses.insert("c-1".to_string(), premium);
        store
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Course
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn missing_course_is_not_found() {
        let decision = evaluate(FakeStore::default(), ResourceType::Course, Some("c-404"), MembershipTier::Pro).await;
        assert!(decision.is_not_found());
        assert!(decision.current_tier().is_none());
    }

    #[tokio::test]
    async fn enrolled_course_is_grandfathered_past_limits_and_premium_flag() {
        let mut store = store_with_course(true);
        store.enrolled_in.insert("c-1".to_string());
        store.enrollment_count = 50;

        let decision = evaluate(store, ResourceType::Course, Some("c-1"), MembershipTier::Free).await;
        assert!(decision.is_granted());
    }

    #[tokio::test]
    async fn premium_course_requires_premium_tier() {
        let decision = evaluate(store_with_course(true), ResourceType::Course, Some("c-1"), MembershipTier::Basic).await;

        assert_eq!(decision.denial(), Some(&DenialReason::RequiresHigherTier));
        assert_eq!(decision.required_tier(), Some(MembershipTier::Premium));
        assert_eq!(decision.current_tier(), Some(MembershipTier::Basic));
    }

    #[tokio::test]
    async fn premium_course_granted_to_premium_tier() {
        let decision = evaluate(store_with_course(true), ResourceType::Course, Some("c-1"), MembershipTier::Premium).await;
        assert!(decision.is_granted());
    }

    #[tokio::test]
    async fn free_tier_at_course_limit_is_denied_with_pro_suggestion() {
        let mut store = store_with_course(false);
        store.enrollment_count = 3;

        let decision = evaluate(store, ResourceType::Course, Some("c-1"), MembershipTier::Free).await;

        assert!(!decision.is_granted());
        assert!(decision.reason().unwrap().contains("course limit"));
        assert_eq!(decision.required_tier(), Some(MembershipTier::Pro));
        assert_eq!(decision.current_tier(), Some(MembershipTier::Free));
    }

    #[tokio::test]
    async fn free_tier_below_course_limit_is_granted() {
        let mut store = store_with_course(false);
        store.enrollment_count = 2;

        let decision = evaluate(store, ResourceType::Course, Some("c-1"), MembershipTier::Free).await;
        assert!(decision.is_granted());
    }

    #[tokio::test]
    async fn unlimited_courses_never_deny_on_count() {
        let mut store = store_with_course(false);
        store.enrollment_count = u64::MAX;

        let decision = evaluate(store, ResourceType::Course, Some("c-1"), MembershipTier::Pro).await;
        assert!(decision.is_granted());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Lesson
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn lesson_inherits_course_denial() {
        let mut store = store_with_course(true);
        store.lessons.insert("l-1".to_string(), "c-1".to_string());

        let decision = evaluate(store, ResourceType::Lesson, Some("l-1"), MembershipTier::Free).await;

        assert_eq!(decision.denial(), Some(&DenialReason::RequiresHigherTier));
        assert_eq!(decision.required_tier(), Some(MembershipTier::Premium));
    }

    #[tokio::test]
    async fn lesson_whose_course_is_gone_is_not_found() {
        let mut store = FakeStore::default();
        store.lessons.insert("l-1".to_string(), "c-gone".to_string());

        let decision = evaluate(store, ResourceType::Lesson, Some("l-1"), MembershipTier::Pro).await;
        assert!(decision.is_not_found());
    }

    #[tokio::test]
    async fn daily_lesson_limit_denies_at_boundary() {
        let mut store = store_with_course(false);
        store.lessons.insert("l-1".to_string(), "c-1".to_string());
        store.enrolled_in.insert("c-1".to_string());
        store.completed_today = 2;

        let decision = evaluate(store, ResourceType::Lesson, Some("l-1"), MembershipTier::Free).await;

        assert!(matches!(
            decision.denial(),
            Some(DenialReason::DailyLessonLimitReached { current: 2, max: 2 })
        ));
        assert_eq!(decision.required_tier(), Some(MembershipTier::Premium));
    }

    #[tokio::test]
    async fn premium_has_no_daily_lesson_limit() {
        let mut store = store_with_course(false);
        store.lessons.insert("l-1".to_string(), "c-1".to_string());
        store.enrolled_in.insert("c-1".to_string());
        store.completed_today = 500;

        let decision = evaluate(store, ResourceType::Lesson, Some("l-1"), MembershipTier::Premium).await;
        assert!(decision.is_granted());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Test
    // ════════════════════════════════════════════════════════════════════════════

    fn store_with_test(attempts: u64) -> FakeStore {
        let mut store = FakeStore::default();
        store.tests.insert("t-1".to_string());
        store.attempts = attempts;
        store
    }

    #[tokio::test]
    async fn retake_limit_denies_when_attempts_equal_limit() {
        let decision = evaluate(store_with_test(2), ResourceType::Test, Some("t-1"), MembershipTier::Basic).await;

        assert!(matches!(
            decision.denial(),
            Some(DenialReason::RetakeLimitReached { current: 2, max: 2 })
        ));
        assert_eq!(decision.required_tier(), Some(MembershipTier::Pro));
    }

    #[tokio::test]
    async fn retake_below_limit_is_granted() {
        let decision = evaluate(store_with_test(1), ResourceType::Test, Some("t-1"), MembershipTier::Basic).await;
        assert!(decision.is_granted());
    }

    #[tokio::test]
    async fn free_tier_with_zero_retakes_is_denied_first_attempt() {
        let decision = evaluate(store_with_test(0), ResourceType::Test, Some("t-1"), MembershipTier::Free).await;
        assert!(!decision.is_granted());
    }

    #[tokio::test]
    async fn missing_test_is_not_found() {
        let decision = evaluate(FakeStore::default(), ResourceType::Test, Some("t-9"), MembershipTier::Pro).await;
        assert!(decision.is_not_found());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Existence-only Types
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn existing_exercise_is_granted_to_any_tier() {
        let mut store = FakeStore::default();
        store.exercises.insert("e-1".to_string());

        let decision = evaluate(store, ResourceType::Exercise, Some("e-1"), MembershipTier::Free).await;
        assert!(decision.is_granted());
    }

    #[tokio::test]
    async fn missing_grammar_is_not_found() {
        let decision = evaluate(FakeStore::default(), ResourceType::Grammar, Some("g-1"), MembershipTier::Pro).await;
        assert!(decision.is_not_found());
    }

    #[tokio::test]
    async fn instance_type_without_id_is_not_found() {
        let decision = evaluate(store_with_course(false), ResourceType::Course, None, MembershipTier::Pro).await;
        assert!(decision.is_not_found());
    }

    #[tokio::test]
    async fn store_failure_is_an_error_not_a_denial() {
        let result = evaluator(FakeStore::default())
            .evaluate(
                ResourceType::Vocabulary,
                Some(&id("v-1")),
                &subscriber(),
                &entitlement(MembershipTier::Pro),
            )
            .await;
        assert!(result.is_err());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Capabilities
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn ai_chat_denied_for_basic_granted_for_premium() {
        let basic = evaluate(FakeStore::default(), ResourceType::AiChat, None, MembershipTier::Basic).await;
        assert!(!basic.is_granted());
        assert_eq!(basic.required_tier(), Some(MembershipTier::Premium));

        let premium = evaluate(FakeStore::default(), ResourceType::AiChat, None, MembershipTier::Premium).await;
        assert!(premium.is_granted());
    }

    #[tokio::test]
    async fn live_tutoring_requires_pro() {
        let premium = evaluate(FakeStore::default(), ResourceType::LiveTutoring, None, MembershipTier::Premium).await;
        assert_eq!(premium.required_tier(), Some(MembershipTier::Pro));

        let pro = evaluate(FakeStore::default(), ResourceType::LiveTutoring, None, MembershipTier::Pro).await;
        assert!(pro.is_granted());
    }

    #[tokio::test]
    async fn capabilities_ignore_resource_id() {
        let decision = evaluate(FakeStore::default(), ResourceType::Analytics, Some("anything"), MembershipTier::Premium).await;
        assert!(decision.is_granted());
    }

    #[tokio::test]
    async fn capability_gates_follow_snapshot_not_catalog() {
        let mut ent = entitlement(MembershipTier::Basic);
        ent.features.certification = true;

        let decision = evaluator(FakeStore::default())
            .evaluate(ResourceType::Certificate, None, &subscriber(), &ent)
            .await
            .unwrap();
        assert!(decision.is_granted());
    }

    #[tokio::test]
    async fn flashcard_and_study_plan_require_premium() {
        for resource_type in [ResourceType::Flashcard, ResourceType::StudyPlan] {
            let decision = evaluate(FakeStore::default(), resource_type, None, MembershipTier::Free).await;
            assert_eq!(decision.required_tier(), Some(MembershipTier::Premium));
            assert!(matches!(decision.denial(), Some(&DenialReason::FeatureNotIncluded { .. })));
        }
    }
}
