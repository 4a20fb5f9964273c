//! HTTP DTOs for entitlement endpoints.
//!
//! Wire form is camelCase. Limits go out in their integer form with `-1`
//! for unlimited, the way clients already read them.

use serde::Serialize;

use crate::application::handlers::{CheckAccessResult, GetEntitlementsResult};
use crate::domain::entitlements::{DenialReason, FeatureBundle, MembershipTier, RequestedType};

// ════════════════════════════════════════════════════════════════════════════════
// Entitlement summary
// ════════════════════════════════════════════════════════════════════════════════

/// Feature bundle as sent to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturesResponse {
    pub max_courses: i64,
    pub max_lessons_per_day: i64,
    pub test_retakes: i64,
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

impl From<&FeatureBundle> for FeaturesResponse {
    fn from(f: &FeatureBundle) -> Self {
        Self {
            max_courses: f.max_courses.as_raw(),
            max_lessons_per_day: f.max_lessons_per_day.as_raw(),
            test_retakes: f.test_retakes.as_raw(),
            ai_chat_access: f.ai_chat_access,
            premium_courses: f.premium_courses,
            offline_access: f.offline_access,
            priority_support: f.priority_support,
            custom_study_plans: f.custom_study_plans,
            advanced_analytics: f.advanced_analytics,
            group_study: f.group_study,
            certification: f.certification,
            live_tutoring: f.live_tutoring,
            flashcards_unlimited: f.flashcards_unlimited,
            progress_tracking: f.progress_tracking,
            export_certificates: f.export_certificates,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageResponse {
    pub enrolled_courses: u64,
    pub lessons_completed_today: u64,
}

/// Units left per limit. `null` when the limit is unlimited.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemainingResponse {
    pub courses: Option<u64>,
    pub lessons_today: Option<u64>,
}

/// Response for `GET /api/entitlements/me`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementsResponse {
    pub tier: MembershipTier,
    pub plan_name: &'static str,
    pub features: FeaturesResponse,
    pub usage: UsageResponse,
    pub remaining: RemainingResponse,
}

impl From<GetEntitlementsResult> for EntitlementsResponse {
    fn from(result: GetEntitlementsResult) -> Self {
        Self {
            tier: result.tier,
            plan_name: result.plan_name,
            features: FeaturesResponse::from(&result.features),
            usage: UsageResponse {
                enrolled_courses: result.usage.enrolled_courses,
                lessons_completed_today: result.usage.lessons_completed_today,
            },
            remaining: RemainingResponse {
                courses: result.remaining.courses,
                lessons_today: result.remaining.lessons_today,
            },
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Access check
// ════════════════════════════════════════════════════════════════════════════════

/// Response for `GET /api/entitlements/access/...`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessCheckResponse {
    pub resource_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    pub granted: bool,
    /// Machine-readable denial code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_tier: Option<MembershipTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_tier: Option<MembershipTier>,
    /// Resolved tier, absent on admin bypass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<MembershipTier>,
    pub bypassed: bool,
}

impl From<CheckAccessResult> for AccessCheckResponse {
    fn from(result: CheckAccessResult) -> Self {
        let resource_type = match &result.target.resource_type {
            RequestedType::Known(t) => t.as_str().to_string(),
            RequestedType::Unknown(raw) => raw.clone(),
        };
        let decision = result.decision;
        Self {
            resource_type,
            resource_id: result.target.resource_id.map(|id| id.to_string()),
            granted: decision.is_granted(),
            code: decision.denial().map(DenialReason::code),
            reason: decision.reason(),
            required_tier: decision.required_tier(),
            current_tier: decision.current_tier(),
            tier: result.tier,
            bypassed: result.bypassed,
        }
    }
}
