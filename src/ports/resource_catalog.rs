//! Resource catalog port.
//!
//! Existence lookups for the instance resources the engine gates. Content
//! itself is owned elsewhere; the engine only needs to know whether a
//! resource exists, whether a course is premium-only, and which course a
//! lesson belongs to.
//!
//! Soft-deleted resources do not exist as far as this port is concerned.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ResourceId};

/// What the engine needs to know about a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseInfo {
    pub id: ResourceId,
    /// Only bundles with premium courses may enroll.
    pub premium: bool,
}

/// What the engine needs to know about a lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonInfo {
    pub id: ResourceId,
    pub course_id: ResourceId,
}

#[async_trait]
pub trait ResourceCatalog: Send + Sync {
    async fn find_course(&self, id: &ResourceId) -> Result<Option<CourseInfo>, DomainError>;

    async fn find_lesson(&self, id: &ResourceId) -> Result<Option<LessonInfo>, DomainError>;

    async fn test_exists(&self, id: &ResourceId) -> Result<bool, DomainError>;

    async fn exercise_exists(&self, id: &ResourceId) -> Result<bool, DomainError>;

    async fn grammar_exists(&self, id: &ResourceId) -> Result<bool, DomainError>;

    async fn vocabulary_exists(&self, id: &ResourceId) -> Result<bool, DomainError>;
}
