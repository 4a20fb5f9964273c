//! Access decisions produced by the evaluator.
//!
//! A denial is an ordinary value. Nothing in here is an error type; the
//! boundary decides how a denial is surfaced.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Feature, MembershipTier};

/// Why access was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DenialReason {
    /// The resource does not exist or is soft-deleted.
    NotFound,

    /// Premium-only course and the bundle lacks premium courses.
    RequiresHigherTier,

    CourseLimitReached {
        /// Courses the subscriber is enrolled in.
        current: u64,
        max: u32,
    },

    DailyLessonLimitReached {
        /// Lessons completed since the start of the local day.
        current: u64,
        max: u32,
    },

    RetakeLimitReached {
        /// Prior attempts on this test.
        current: u64,
        max: u32,
    },

    /// A capability flag is off in the bundle.
    FeatureNotIncluded { feature: Feature },

    /// The subscriber does not own the resource's parent lesson or course.
    NotEnrolled,

    UnknownResourceType { name: String },
}

impl DenialReason {
    /// Short reason string carried in the boundary payload.
    pub fn reason(&self) -> String {
        match self {
            DenialReason::NotFound => "not found".to_string(),
            DenialReason::RequiresHigherTier => "requires higher tier".to_string(),
            DenialReason::CourseLimitReached { current, max } => {
                format!("course limit reached ({} of {} courses)", current, max)
            }
            DenialReason::DailyLessonLimitReached { current, max } => {
                format!("daily lesson limit reached ({} of {} lessons today)", current, max)
            }
            DenialReason::RetakeLimitReached { current, max } => {
                format!("retake limit reached ({} of {} attempts)", current, max)
            }
            DenialReason::FeatureNotIncluded { feature } => {
                format!("{} is not included in your plan", feature)
            }
            DenialReason::NotEnrolled => "not enrolled".to_string(),
            DenialReason::UnknownResourceType { name } => {
                format!("unknown resource type '{}'", name)
            }
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            DenialReason::NotFound => "not_found",
            DenialReason::RequiresHigherTier => "requires_higher_tier",
            DenialReason::CourseLimitReached { .. } => "course_limit_reached",
            DenialReason::DailyLessonLimitReached { .. } => "daily_lesson_limit_reached",
            DenialReason::RetakeLimitReached { .. } => "retake_limit_reached",
            DenialReason::FeatureNotIncluded { .. } => "feature_not_included",
            DenialReason::NotEnrolled => "not_enrolled",
            DenialReason::UnknownResourceType { .. } => "unknown_resource_type",
        }
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// Outcome of evaluating one request.
///
/// Only built through [`grant`](Self::grant), [`not_found`](Self::not_found)
/// and [`deny`](Self::deny), so `granted` holds exactly when there is no
/// denial reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessDecision {
    granted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    denial: Option<DenialReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    required_tier: Option<MembershipTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_tier: Option<MembershipTier>,
}

impl AccessDecision {
    pub fn grant() -> Self {
        Self {
            granted: true,
            denial: None,
            required_tier: None,
            current_tier: None,
        }
    }

    /// Existence failure. Carries no tier information.
    pub fn not_found() -> Self {
        Self {
            granted: false,
            denial: Some(DenialReason::NotFound),
            required_tier: None,
            current_tier: None,
        }
    }

    /// Policy denial, recording the subscriber's tier for upgrade prompts.
    pub fn deny(
        reason: DenialReason,
        required_tier: Option<MembershipTier>,
        current_tier: MembershipTier,
    ) -> Self {
        Self {
            granted: false,
            denial: Some(reason),
            required_tier,
            current_tier: Some(current_tier),
        }
    }

    pub fn is_granted(&self) -> bool {
        self.granted
    }

    pub fn denial(&self) -> Option<&DenialReason> {
        self.denial.as_ref()
    }

    /// Cheapest tier that would lift the denial, when upgrading helps.
    pub fn required_tier(&self) -> Option<MembershipTier> {
        self.required_tier
    }

    /// Tier the subscriber was evaluated at. Absent on grants and not found.
    pub fn current_tier(&self) -> Option<MembershipTier> {
        self.current_tier
    }

    /// True when the denial is an existence failure rather than a policy one.
    pub fn is_not_found(&self) -> bool {
        matches!(self.denial, Some(DenialReason::NotFound))
    }

    /// Reason string, if denied.
    pub fn reason(&self) -> Option<String> {
        self.denial.as_ref().map(DenialReason::reason)
    }
}
