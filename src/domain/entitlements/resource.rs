//! Resource types that can be gated, and the target of an access request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ResourceId, ValidationError};

/// Category of thing being accessed.
///
/// The first six variants are instance resources: they need a concrete id and
/// an existence check. The remaining six are capabilities gated by a single
/// feature flag, independent of any instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Course,
    Lesson,
    Test,
    Exercise,
    Grammar,
    Vocabulary,
    AiChat,
    Flashcard,
    Certificate,
    Analytics,
    StudyPlan,
    LiveTutoring,
}

impl ResourceType {
    pub const ALL: [ResourceType; 12] = [
        ResourceType::Course,
        ResourceType::Lesson,
        ResourceType::Test,
        ResourceType::Exercise,
        ResourceType::Grammar,
        ResourceType::Vocabulary,
        ResourceType::AiChat,
        ResourceType::Flashcard,
        ResourceType::Certificate,
        ResourceType::Analytics,
        ResourceType::StudyPlan,
        ResourceType::LiveTutoring,
    ];

    /// Returns true if evaluating this type needs a resource id.
    pub fn requires_instance(&self) -> bool {
        matches!(
            self,
            ResourceType::Course
                | ResourceType::Lesson
                | ResourceType::Test
                | ResourceType::Exercise
                | ResourceType::Grammar
                | ResourceType::Vocabulary
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Course => "course",
            ResourceType::Lesson => "lesson",
            ResourceType::Test => "test",
            ResourceType::Exercise => "exercise",
            ResourceType::Grammar => "grammar",
            ResourceType::Vocabulary => "vocabulary",
            ResourceType::AiChat => "ai_chat",
            ResourceType::Flashcard => "flashcard",
            ResourceType::Certificate => "certificate",
            ResourceType::Analytics => "analytics",
            ResourceType::StudyPlan => "study_plan",
            ResourceType::LiveTutoring => "live_tutoring",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = ValidationError;

    /// Accepts `ai_chat`, `AI_CHAT` and `ai-chat`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        ResourceType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| {
                ValidationError::invalid_format("resource_type", format!("unknown resource type '{}'", s))
            })
    }
}

/// Resource type as named by a caller, which may not be one we know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestedType {
    Known(ResourceType),
    Unknown(String),
}

impl RequestedType {
    /// Parses a caller-supplied name, keeping unrecognized names as data.
    pub fn parse(raw: &str) -> Self {
        raw.parse()
            .map(RequestedType::Known)
            .unwrap_or_else(|_| RequestedType::Unknown(raw.to_string()))
    }
}

impl From<ResourceType> for RequestedType {
    fn from(value: ResourceType) -> Self {
        RequestedType::Known(value)
    }
}

impl fmt::Display for RequestedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestedType::Known(t) => write!(f, "{}", t),
            RequestedType::Unknown(raw) => write!(f, "{}", raw),
        }
    }
}

/// What a request wants to reach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceTarget {
    pub resource_type: RequestedType,
    pub resource_id: Option<ResourceId>,
}

impl ResourceTarget {
    /// Target for an instance resource.
    pub fn instance(resource_type: ResourceType, resource_id: ResourceId) -> Self {
        Self {
            resource_type: resource_type.into(),
            resource_id: Some(resource_id),
        }
    }

    /// Target for a capability with no instance.
    pub fn capability(resource_type: ResourceType) -> Self {
        Self {
            resource_type: resource_type.into(),
            resource_id: None,
        }
    }

    /// Target built from raw request parameters.
    pub fn parse(resource_type: &str, resource_id: Option<ResourceId>) -> Self {
        Self {
            resource_type: RequestedType::parse(resource_type),
            resource_id,
        }
    }
}
