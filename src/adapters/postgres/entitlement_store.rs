//! PostgreSQL implementation of the entitlement read ports.
//!
//! One store backs subscriptions, the resource catalog, usage counts and
//! ownership. Every query skips soft-deleted rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entitlements::{
    FeatureBundle, MembershipTier, ResourceType, Subscription, UsageStats,
};
use crate::domain::foundation::{
    DomainError, ErrorCode, ResourceId, SubscriberId, SubscriptionId, Timestamp,
};
use crate::ports::{
    CourseInfo, LessonInfo, Ownership, OwnershipChecker, ResourceCatalog, SubscriptionReader,
    UsageReader,
};

/// PostgreSQL-backed store for every read port the access engine needs.
#[derive(Clone)]
pub struct PostgresEntitlementStore {
    pool: PgPool,
}

impl PostgresEntitlementStore {
    /// Creates a new store with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists_in(&self, resource_type: ResourceType, id: &ResourceId) -> Result<bool, DomainError> {
        let table = item_table(resource_type).ok_or_else(|| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("{} has no item table", resource_type),
            )
        })?;

        let query = format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE id = $1 AND deleted_at IS NULL)",
            table
        );
        sqlx::query_scalar(&query)
            .bind(id.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error(format!("Failed to look up {}", resource_type), e))
    }

    async fn course_owning(
        &self,
        resource_type: ResourceType,
        id: &ResourceId,
    ) -> Result<Option<String>, DomainError> {
        let query = match resource_type {
            ResourceType::Lesson => {
                "SELECT course_id FROM lessons WHERE id = $1 AND deleted_at IS NULL".to_string()
            }
            other => match item_table(other) {
                Some(table) => format!(
                    r#"
                    SELECT l.course_id
                    FROM {} t
                    JOIN lessons l ON l.id = t.lesson_id
                    WHERE t.id = $1 AND t.deleted_at IS NULL AND l.deleted_at IS NULL
                    "#,
                    table
                ),
                None => return Ok(None),
            },
        };

        sqlx::query_scalar(&query)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to resolve owning course", e))
    }
}

/// Table holding lesson-scoped items of a given type.
fn item_table(resource_type: ResourceType) -> Option<&'static str> {
    match resource_type {
        ResourceType::Test => Some("tests"),
        ResourceType::Exercise => Some("exercises"),
        ResourceType::Grammar => Some("grammar"),
        ResourceType::Vocabulary => Some("vocabulary"),
        _ => None,
    }
}

fn db_error(context: impl Into<String>, err: sqlx::Error) -> DomainError {
    DomainError::database(format!("{}: {}", context.into(), err))
}

/// Converts a SQL count. A negative value means a corrupt row or query.
fn count(raw: i64, what: &str) -> Result<u64, DomainError> {
    u64::try_from(raw)
        .map_err(|_| DomainError::database(format!("Invalid {} count: {}", what, raw)))
}

fn counter(raw: i32, column: &str) -> Result<u32, DomainError> {
    u32::try_from(raw)
        .map_err(|_| DomainError::database(format!("Invalid {}: {}", column, raw)))
}

/// Database row representation of a subscription.
#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: Uuid,
    subscriber_id: String,
    tier: String,
    features: Json<FeatureBundle>,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    is_active: bool,
    auto_renew: bool,
    courses_enrolled: i32,
    lessons_completed: i32,
    tests_taken: i32,
    ai_messages: i32,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = DomainError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        let tier: MembershipTier = row.tier.parse().map_err(|e| {
            DomainError::database(format!("Invalid tier value: {}", e))
                .with_detail("subscription_id", row.id.to_string())
        })?;
        let subscriber_id = SubscriberId::new(row.subscriber_id)
            .map_err(|e| DomainError::database(format!("Invalid subscriber_id: {}", e)))?;
        let usage = UsageStats {
            courses_enrolled: counter(row.courses_enrolled, "courses_enrolled")?,
            lessons_completed: counter(row.lessons_completed, "lessons_completed")?,
            tests_taken: counter(row.tests_taken, "tests_taken")?,
            ai_messages: counter(row.ai_messages, "ai_messages")?,
        };

        Ok(Subscription {
            id: SubscriptionId::from_uuid(row.id),
            subscriber_id,
            tier,
            features: row.features.0,
            start_date: Timestamp::from_datetime(row.start_date),
            end_date: Timestamp::from_datetime(row.end_date),
            is_active: row.is_active,
            auto_renew: row.auto_renew,
            usage,
            deleted_at: row.deleted_at.map(Timestamp::from_datetime),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CourseRow {
    id: String,
    is_premium: bool,
}

#[derive(Debug, sqlx::FromRow)]
struct LessonRow {
    id: String,
    course_id: String,
}

fn resource_id(raw: String, column: &str) -> Result<ResourceId, DomainError> {
    ResourceId::new(raw).map_err(|e| DomainError::database(format!("Invalid {}: {}", column, e)))
}

/// Owning course of an item row, if the item hangs off a lesson.
fn owning_course(raw: Option<String>) -> Result<Option<ResourceId>, DomainError> {
    raw.map(|course_id| resource_id(course_id, "course_id")).transpose()
}

#[async_trait]
impl SubscriptionReader for PostgresEntitlementStore {
    async fn find_active_subscription(
        &self,
        subscriber_id: &SubscriberId,
        now: Timestamp,
    ) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(
            r#"
            SELECT id, subscriber_id, tier, features, start_date, end_date, is_active,
                   auto_renew, courses_enrolled, lessons_completed, tests_taken,
                   ai_messages, deleted_at
            FROM subscriptions
            WHERE subscriber_id = $1
              AND is_active
              AND end_date >= $2
              AND deleted_at IS NULL
            ORDER BY end_date DESC
            LIMIT 1
            "#,
        )
        .bind(subscriber_id.as_str())
        .bind(now.as_datetime())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to get subscription", e))?;

        row.map(Subscription::try_from).transpose()
    }
}

#[async_trait]
impl ResourceCatalog for PostgresEntitlementStore {
    async fn find_course(&self, id: &ResourceId) -> Result<Option<CourseInfo>, DomainError> {
        let row: Option<CourseRow> = sqlx::query_as(
            "SELECT id, is_premium FROM courses WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to get course", e))?;

        row.map(|r| {
            Ok(CourseInfo {
                id: resource_id(r.id, "course id")?,
                premium: r.is_premium,
            })
        })
        .transpose()
    }

    async fn find_lesson(&self, id: &ResourceId) -> Result<Option<LessonInfo>, DomainError> {
        let row: Option<LessonRow> = sqlx::query_as(
            "SELECT id, course_id FROM lessons WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to get lesson", e))?;

        row.map(|r| {
            Ok(LessonInfo {
                id: resource_id(r.id, "lesson id")?,
                course_id: resource_id(r.course_id, "course_id")?,
            })
        })
        .transpose()
    }

    async fn test_exists(&self, id: &ResourceId) -> Result<bool, DomainError> {
        self.exists_in(ResourceType::Test, id).await
    }

    async fn exercise_exists(&self, id: &ResourceId) -> Result<bool, DomainError> {
        self.exists_in(ResourceType::Exercise, id).await
    }

    async fn grammar_exists(&self, id: &ResourceId) -> Result<bool, DomainError> {
        self.exists_in(ResourceType::Grammar, id).await
    }

    async fn vocabulary_exists(&self, id: &ResourceId) -> Result<bool, DomainError> {
        self.exists_in(ResourceType::Vocabulary, id).await
    }
}

#[async_trait]
impl UsageReader for PostgresEntitlementStore {
    async fn is_enrolled(
        &self,
        subscriber_id: &SubscriberId,
        course_id: &ResourceId,
    ) -> Result<bool, DomainError> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM enrollments
                WHERE subscriber_id = $1 AND course_id = $2 AND deleted_at IS NULL
            )
            "#,
        )
        .bind(subscriber_id.as_str())
        .bind(course_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to check enrollment", e))
    }

    async fn count_enrollments(&self, subscriber_id: &SubscriberId) -> Result<u64, DomainError> {
        let raw: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM enrollments WHERE subscriber_id = $1 AND deleted_at IS NULL",
        )
        .bind(subscriber_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to count enrollments", e))?;

        count(raw, "enrollment")
    }

    async fn count_lessons_completed_since(
        &self,
        subscriber_id: &SubscriberId,
        since: Timestamp,
    ) -> Result<u64, DomainError> {
        let raw: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM lesson_completions
            WHERE subscriber_id = $1 AND completed_at >= $2
            "#,
        )
        .bind(subscriber_id.as_str())
        .bind(since.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to count lesson completions", e))?;

        count(raw, "lesson completion")
    }

    async fn count_test_attempts(
        &self,
        subscriber_id: &SubscriberId,
        test_id: &ResourceId,
    ) -> Result<u64, DomainError> {
        let raw: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM test_attempts
            WHERE subscriber_id = $1 AND test_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(subscriber_id.as_str())
        .bind(test_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to count test attempts", e))?;

        count(raw, "test attempt")
    }
}

#[async_trait]
impl OwnershipChecker for PostgresEntitlementStore {
    async fn check_ownership(
        &self,
        subscriber_id: &SubscriberId,
        resource_type: ResourceType,
        id: &ResourceId,
    ) -> Result<Ownership, DomainError> {
        let raw = self.course_owning(resource_type, id).await?;
        let Some(course_id) = owning_course(raw)? else {
            return Ok(Ownership::NotApplicable);
        };

        if self.is_enrolled(subscriber_id, &course_id).await? {
            Ok(Ownership::Owner)
        } else {
            Ok(Ownership::NotOwner)
        }
    }
}
