//! Feature bundle attached to a tier or snapshotted into a subscription.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Limit;

/// Boolean entitlements a bundle can switch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    AiChatAccess,
    PremiumCourses,
    OfflineAccess,
    PrioritySupport,
    CustomStudyPlans,
    AdvancedAnalytics,
    GroupStudy,
    Certification,
    LiveTutoring,
    FlashcardsUnlimited,
    ProgressTracking,
    ExportCertificates,
}

impl Feature {
    /// Human readable name used in denial messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Feature::AiChatAccess => "AI chat",
            Feature::PremiumCourses => "Premium courses",
            Feature::OfflineAccess => "Offline access",
            Feature::PrioritySupport => "Priority support",
            Feature::CustomStudyPlans => "Custom study plans",
            Feature::AdvancedAnalytics => "Advanced analytics",
            Feature::GroupStudy => "Group study",
            Feature::Certification => "Certificates",
            Feature::LiveTutoring => "Live tutoring",
            Feature::FlashcardsUnlimited => "Unlimited flashcards",
            Feature::ProgressTracking => "Progress tracking",
            Feature::ExportCertificates => "Certificate export",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Numeric and boolean entitlements of a tier.
///
/// Immutable once built. A subscription keeps its own copy taken at purchase
/// time, so it can legitimately differ from the current catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureBundle {
    pub max_courses: Limit,
    pub max_lessons_per_day: Limit,
    pub test_retakes: Limit,
    pub ai_chat_access: bool,
    pub premium_courses: bool,
    pub offline_access: bool,
    pub priority_support: bool,
    pub custom_study_plans: bool,
    pub advanced_analytics: bool,
    pub group_study: bool,
    pub certification: bool,
    pub live_tutoring: bool,
    pub flashcards_unlimited: bool,
    pub progress_tracking: bool,
    pub export_certificates: bool,
}

impl FeatureBundle {
    /// Returns whether the given flag is enabled in this bundle.
    pub fn has(&self, feature: Feature) -> bool {
        match feature {
            Feature::AiChatAccess => self.ai_chat_access,
            Feature::PremiumCourses => self.premium_courses,
            Feature::OfflineAccess => self.offline_access,
            Feature::PrioritySupport => self.priority_support,
            Feature::CustomStudyPlans => self.custom_study_plans,
            Feature::AdvancedAnalytics => self.advanced_analytics,
            Feature::GroupStudy => self.group_study,
            Feature::Certification => self.certification,
            Feature::LiveTutoring => self.live_tutoring,
            Feature::FlashcardsUnlimited => self.flashcards_unlimited,
            Feature::ProgressTracking => self.progress_tracking,
            Feature::ExportCertificates => self.export_certificates,
        }
    }

    /// Bundle with every flag enabled and every limit unlimited.
    pub fn unrestricted() -> Self {
        Self {
            max_courses: Limit::Unlimited,
            max_lessons_per_day: Limit::Unlimited,
            test_retakes: Limit::Unlimited,
            ai_chat_access: true,
            premium_courses: true,
            offline_access: true,
            priority_support: true,
            custom_study_plans: true,
            advanced_analytics: true,
            group_study: true,
            certification: true,
            live_tutoring: true,
            flashcards_unlimited: true,
            progress_tracking: true,
            export_certificates: true,
        }
    }
}
