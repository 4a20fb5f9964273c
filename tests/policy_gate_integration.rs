//! Integration tests for the Policy Gate.
//!
//! Drives the full pipeline (resolver, evaluator, ownership) against the
//! in-memory entitlement store:
//! 1. Identity and admin bypass
//! 2. Tier, feature and limit rules per resource type
//! 3. Ownership stage
//! 4. Degraded subscription store

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use learnhub_access::adapters::memory::InMemoryEntitlementStore;
use learnhub_access::application::access::{
    AccessEvaluator, PolicyGate, ResourceAccessEvaluator, SubscriptionResolver, UsageCounter,
};
use learnhub_access::domain::entitlements::{
    AccessDecision, AccessError, DenialReason, Entitlement, MembershipTier, ResourceTarget,
    ResourceType, Subscription,
};
use learnhub_access::domain::foundation::{
    AuthenticatedUser, DomainError, ResourceId, Role, SubscriberId, Timestamp,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

const LEARNER: &str = "learner-1";

fn subscriber() -> SubscriberId {
    SubscriberId::new(LEARNER).unwrap()
}

fn user(role: Role) -> AuthenticatedUser {
    AuthenticatedUser::new(subscriber(), "learner@example.com", None, role)
}

fn student() -> AuthenticatedUser {
    user(Role::Student)
}

fn id(raw: &str) -> ResourceId {
    ResourceId::new(raw).unwrap()
}

fn subscribed(tier: MembershipTier) -> Subscription {
    Subscription::purchase(subscriber(), tier, Timestamp::now())
}

fn gate(store: Arc<InMemoryEntitlementStore>) -> PolicyGate {
    let usage = UsageCounter::new(store.clone());
    let evaluator = ResourceAccessEvaluator::new(store.clone(), usage);
    PolicyGate::new(SubscriptionResolver::new(store), Arc::new(evaluator))
}

fn gate_with_ownership(store: Arc<InMemoryEntitlementStore>) -> PolicyGate {
    gate(store.clone()).with_ownership(store)
}

fn course(raw: &str) -> ResourceTarget {
    ResourceTarget::instance(ResourceType::Course, id(raw))
}

fn denial(result: Result<impl std::fmt::Debug, AccessError>) -> (DenialReason, Option<MembershipTier>, Option<MembershipTier>) {
    match result {
        Err(AccessError::Denied(denial)) => (denial.reason, denial.required_tier, denial.current_tier),
        other => panic!("expected a policy denial, got {:?}", other),
    }
}

/// Evaluator that records calls and always grants.
#[derive(Default)]
struct CountingEvaluator {
    calls: AtomicUsize,
}

#[async_trait]
impl AccessEvaluator for CountingEvaluator {
    async fn evaluate(
        &self,
        _resource_type: ResourceType,
        _resource_id: Option<&ResourceId>,
        _subscriber_id: &SubscriberId,
        _entitlement: &Entitlement,
    ) -> Result<AccessDecision, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(AccessDecision::grant())
    }
}

// =============================================================================
// Identity and Admin Bypass
// =============================================================================

#[tokio::test]
async fn missing_identity_is_unauthenticated() {
    let gate = gate(Arc::new(InMemoryEntitlementStore::new().with_course("c-1", false)));
    let result = gate.authorize(None, &course("c-1")).await;
    assert_eq!(result.unwrap_err(), AccessError::Unauthenticated);
}

#[tokio::test]
async fn admin_bypass_skips_evaluation_entirely() {
    let store = Arc::new(InMemoryEntitlementStore::new().failing_subscriptions());
    let spy = Arc::new(CountingEvaluator::default());
    let gate = PolicyGate::new(SubscriptionResolver::new(store), spy.clone());

    let grant = gate
        .authorize(Some(&user(Role::Admin)), &course("does-not-exist"))
        .await
        .unwrap();

    assert!(grant.bypassed);
    assert!(grant.tier.is_none());
    assert_eq!(spy.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn instructor_is_not_administrative() {
    let gate = gate(Arc::new(InMemoryEntitlementStore::new()));
    let result = gate
        .authorize(Some(&user(Role::Instructor)), &ResourceTarget::capability(ResourceType::AiChat))
        .await;
    let (reason, _, current) = denial(result);
    assert!(matches!(reason, DenialReason::FeatureNotIncluded { .. }));
    assert_eq!(current, Some(MembershipTier::Free));
}

// =============================================================================
// Courses
// =============================================================================

#[tokio::test]
async fn free_subscriber_at_course_limit_is_denied_with_pro_upgrade() {
    let store = InMemoryEntitlementStore::new()
        .with_course("c-new", false)
        .with_enrollments(LEARNER, 3);
    let gate = gate(Arc::new(store));

    let (reason, required, current) = denial(gate.authorize(Some(&student()), &course("c-new")).await);

    assert_eq!(reason, DenialReason::CourseLimitReached { current: 3, max: 3 });
    assert!(reason.reason().contains("course limit"));
    assert_eq!(required, Some(MembershipTier::Pro));
    assert_eq!(current, Some(MembershipTier::Free));
}

#[tokio::test]
async fn enrolled_course_is_grandfathered_past_the_limit() {
    let store = InMemoryEntitlementStore::new()
        .with_course("c-old", true)
        .with_enrollment(LEARNER, "c-old")
        .with_enrollments(LEARNER, 5);
    let gate = gate(Arc::new(store));

    assert!(gate.authorize(Some(&student()), &course("c-old")).await.is_ok());
}

#[tokio::test]
async fn premium_course_needs_premium_bundle() {
    let store = Arc::new(
        InMemoryEntitlementStore::new()
            .with_course("c-premium", true)
            .with_subscription(subscribed(MembershipTier::Basic)),
    );
    let gate = gate(store.clone());

    let (reason, required, current) = denial(gate.authorize(Some(&student()), &course("c-premium")).await);
    assert_eq!(reason, DenialReason::RequiresHigherTier);
    assert_eq!(required, Some(MembershipTier::Premium));
    assert_eq!(current, Some(MembershipTier::Basic));

    store.add_subscription(subscribed(MembershipTier::Premium)).await;
    let grant = gate.authorize(Some(&student()), &course("c-premium")).await.unwrap();
    assert_eq!(grant.tier, Some(MembershipTier::Premium));
}

#[tokio::test]
async fn deleted_course_is_not_found() {
    let store = Arc::new(InMemoryEntitlementStore::new().with_course("c-1", false));
    let gate = gate(store.clone());
    assert!(gate.authorize(Some(&student()), &course("c-1")).await.is_ok());

    store.delete_course(&id("c-1")).await;

    let err = gate.authorize(Some(&student()), &course("c-1")).await.unwrap_err();
    assert_eq!(
        err,
        AccessError::NotFound {
            resource_type: "course".to_string(),
            resource_id: Some("c-1".to_string()),
        }
    );
}

#[tokio::test]
async fn withdrawing_frees_a_course_slot() {
    let store = Arc::new(
        InMemoryEntitlementStore::new()
            .with_course("c-1", false)
            .with_course("c-2", false)
            .with_course("c-3", false)
            .with_course("c-4", false),
    );
    let gate = gate(store.clone());
    for c in ["c-1", "c-2", "c-3"] {
        store.enroll(&subscriber(), &id(c)).await;
    }
    assert!(gate.authorize(Some(&student()), &course("c-4")).await.is_err());

    store.withdraw(&subscriber(), &id("c-2")).await;

    assert!(gate.authorize(Some(&student()), &course("c-4")).await.is_ok());
}

#[tokio::test]
async fn unlimited_tier_never_hits_course_limit() {
    let store = InMemoryEntitlementStore::new()
        .with_course("c-new", false)
        .with_enrollments(LEARNER, 500)
        .with_subscription(subscribed(MembershipTier::Pro));
    let gate = gate(Arc::new(store));

    assert!(gate.authorize(Some(&student()), &course("c-new")).await.is_ok());
}

// =============================================================================
// Lessons
// =============================================================================

#[tokio::test]
async fn lesson_inherits_course_denial() {
    let store = InMemoryEntitlementStore::new()
        .with_course("c-premium", true)
        .with_lesson("l-1", "c-premium");
    let gate = gate(Arc::new(store));

    let target = ResourceTarget::instance(ResourceType::Lesson, id("l-1"));
    let (reason, required, _) = denial(gate.authorize(Some(&student()), &target).await);
    assert_eq!(reason, DenialReason::RequiresHigherTier);
    assert_eq!(required, Some(MembershipTier::Premium));
}

#[tokio::test]
async fn daily_lesson_limit_counts_completions_today() {
    let store = Arc::new(
        InMemoryEntitlementStore::new()
            .with_course("c-1", false)
            .with_lesson("l-1", "c-1")
            .with_enrollment(LEARNER, "c-1")
            .with_completion(LEARNER, Timestamp::now().minus_days(2)),
    );
    let gate = gate(store.clone());
    let target = ResourceTarget::instance(ResourceType::Lesson, id("l-1"));

    store.complete_lesson(&subscriber(), Timestamp::now()).await;
    assert!(gate.authorize(Some(&student()), &target).await.is_ok());

    store.complete_lesson(&subscriber(), Timestamp::now()).await;
    let (reason, required, _) = denial(gate.authorize(Some(&student()), &target).await);
    assert_eq!(reason, DenialReason::DailyLessonLimitReached { current: 2, max: 2 });
    assert_eq!(required, Some(MembershipTier::Premium));
}

#[tokio::test]
async fn lesson_without_id_is_not_found() {
    let gate = gate(Arc::new(InMemoryEntitlementStore::new()));
    let target = ResourceTarget {
        resource_type: ResourceType::Lesson.into(),
        resource_id: None,
    };
    let err = gate.authorize(Some(&student()), &target).await.unwrap_err();
    assert!(matches!(err, AccessError::NotFound { resource_id: None, .. }));
}

// =============================================================================
// Tests and Retakes
// =============================================================================

#[tokio::test]
async fn free_tier_has_no_test_attempts() {
    let store = InMemoryEntitlementStore::new().with_item(ResourceType::Test, "t-1", None);
    let gate = gate(Arc::new(store));

    let target = ResourceTarget::instance(ResourceType::Test, id("t-1"));
    let (reason, required, _) = denial(gate.authorize(Some(&student()), &target).await);
    assert_eq!(reason, DenialReason::RetakeLimitReached { current: 0, max: 0 });
    assert_eq!(required, Some(MembershipTier::Pro));
}

#[tokio::test]
async fn basic_tier_retakes_until_reset() {
    let store = Arc::new(
        InMemoryEntitlementStore::new()
            .with_item(ResourceType::Test, "t-1", None)
            .with_subscription(subscribed(MembershipTier::Basic))
            .with_attempt(LEARNER, "t-1"),
    );
    let gate = gate(store.clone());
    let target = ResourceTarget::instance(ResourceType::Test, id("t-1"));

    assert!(gate.authorize(Some(&student()), &target).await.is_ok());

    store.record_attempt(&subscriber(), &id("t-1")).await;
    assert!(gate.authorize(Some(&student()), &target).await.is_err());

    store.reset_attempts(&subscriber(), &id("t-1")).await;
    assert!(gate.authorize(Some(&student()), &target).await.is_ok());
}

// =============================================================================
// Capabilities
// =============================================================================

#[tokio::test]
async fn capabilities_follow_the_bundle() {
    let store = InMemoryEntitlementStore::new().with_subscription(subscribed(MembershipTier::Premium));
    let gate = gate(Arc::new(store));

    for granted in [
        ResourceType::AiChat,
        ResourceType::Flashcard,
        ResourceType::Certificate,
        ResourceType::Analytics,
        ResourceType::StudyPlan,
    ] {
        let target = ResourceTarget::capability(granted);
        assert!(gate.authorize(Some(&student()), &target).await.is_ok(), "{} denied", granted);
    }

    let tutoring = ResourceTarget::capability(ResourceType::LiveTutoring);
    let (_, required, current) = denial(gate.authorize(Some(&student()), &tutoring).await);
    assert_eq!(required, Some(MembershipTier::Pro));
    assert_eq!(current, Some(MembershipTier::Premium));
}

#[tokio::test]
async fn unknown_resource_type_is_denied_without_evaluating() {
    let spy = Arc::new(CountingEvaluator::default());
    let store = Arc::new(InMemoryEntitlementStore::new());
    let gate = PolicyGate::new(SubscriptionResolver::new(store), spy.clone());

    let target = ResourceTarget::parse("podcast", None);
    let (reason, _, _) = denial(gate.authorize(Some(&student()), &target).await);

    assert_eq!(reason, DenialReason::UnknownResourceType { name: "podcast".to_string() });
    assert_eq!(spy.calls.load(Ordering::SeqCst), 0);
}

// =============================================================================
// Ownership
// =============================================================================

#[tokio::test]
async fn ownership_requires_enrollment_in_owning_course() {
    let store = Arc::new(
        InMemoryEntitlementStore::new()
            .with_course("c-1", false)
            .with_lesson("l-1", "c-1")
            .with_item(ResourceType::Exercise, "e-1", Some("l-1")),
    );
    let gate = gate_with_ownership(store.clone());
    let target = ResourceTarget::instance(ResourceType::Exercise, id("e-1"));

    let (reason, required, _) = denial(gate.authorize(Some(&student()), &target).await);
    assert_eq!(reason, DenialReason::NotEnrolled);
    assert!(required.is_none());

    store.enroll(&subscriber(), &id("c-1")).await;
    assert!(gate.authorize(Some(&student()), &target).await.is_ok());
}

#[tokio::test]
async fn non_owner_at_retake_limit_is_not_offered_an_upgrade() {
    let store = Arc::new(
        InMemoryEntitlementStore::new()
            .with_course("c-1", false)
            .with_lesson("l-1", "c-1")
            .with_item(ResourceType::Test, "t-1", Some("l-1")),
    );
    let gate = gate_with_ownership(store.clone());
    let target = ResourceTarget::instance(ResourceType::Test, id("t-1"));

    // FREE allows no attempts, but enrollment is what is missing.
    let (reason, required, current) = denial(gate.authorize(Some(&student()), &target).await);
    assert_eq!(reason, DenialReason::NotEnrolled);
    assert!(required.is_none());
    assert_eq!(current, Some(MembershipTier::Free));

    store.add_subscription(subscribed(MembershipTier::Pro)).await;
    let (reason, _, current) = denial(gate.authorize(Some(&student()), &target).await);
    assert_eq!(reason, DenialReason::NotEnrolled);
    assert_eq!(current, Some(MembershipTier::Pro));

    store.enroll(&subscriber(), &id("c-1")).await;
    assert!(gate.authorize(Some(&student()), &target).await.is_ok());
}

#[tokio::test]
async fn missing_resource_is_not_found_with_ownership_enforced() {
    let store = Arc::new(InMemoryEntitlementStore::new().with_course("c-1", false));
    let gate = gate_with_ownership(store);
    let target = ResourceTarget::instance(ResourceType::Exercise, id("e-404"));

    assert!(matches!(
        gate.authorize(Some(&student()), &target).await,
        Err(AccessError::NotFound { .. })
    ));
}

#[tokio::test]
async fn ownership_is_skipped_for_standalone_items_and_when_disabled() {
    let store = Arc::new(
        InMemoryEntitlementStore::new()
            .with_course("c-1", false)
            .with_lesson("l-1", "c-1")
            .with_item(ResourceType::Grammar, "g-1", Some("l-1"))
            .with_item(ResourceType::Vocabulary, "v-1", None),
    );

    let enforced = gate_with_ownership(store.clone());
    let standalone = ResourceTarget::instance(ResourceType::Vocabulary, id("v-1"));
    assert!(enforced.authorize(Some(&student()), &standalone).await.is_ok());

    let relaxed = gate(store);
    let owned = ResourceTarget::instance(ResourceType::Grammar, id("g-1"));
    assert!(relaxed.authorize(Some(&student()), &owned).await.is_ok());
}

// =============================================================================
// Degraded Subscription Store
// =============================================================================

#[tokio::test]
async fn subscription_store_failure_falls_back_to_free() {
    let store = InMemoryEntitlementStore::new()
        .failing_subscriptions()
        .with_subscription(subscribed(MembershipTier::Enterprise));
    let gate = gate(Arc::new(store));

    let outcome = gate
        .decide(Some(&student()), &ResourceTarget::capability(ResourceType::AiChat))
        .await
        .unwrap();

    assert_eq!(outcome.tier, Some(MembershipTier::Free));
    assert!(!outcome.decision.is_granted());
}

#[tokio::test]
async fn expired_subscription_falls_back_to_free() {
    let now = Timestamp::now();
    let expired = Subscription::purchase(subscriber(), MembershipTier::Pro, now.minus_days(40))
        .with_end_date(now.minus_days(10));
    let gate = gate(Arc::new(InMemoryEntitlementStore::new().with_subscription(expired)));

    let outcome = gate
        .decide(Some(&student()), &ResourceTarget::capability(ResourceType::LiveTutoring))
        .await
        .unwrap();

    assert_eq!(outcome.tier, Some(MembershipTier::Free));
    assert!(!outcome.decision.is_granted());
}
