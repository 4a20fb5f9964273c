//! Tier catalog.
//!
//! Static registry of every membership tier with its feature bundle and
//! commercial metadata. Built once on first use and read-only afterwards.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

use super::{FeatureBundle, Limit, MembershipTier};

/// Commercial definition of a tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierPlan {
    pub tier: MembershipTier,
    pub display_name: &'static str,
    /// Price per billing period, in cents.
    pub price_cents: i64,
    /// Length of one billing period. Zero for the free tier.
    pub duration_days: u32,
    pub features: FeatureBundle,
}

impl TierPlan {
    /// Defines the plan for a tier.
    ///
    /// | Tier | Courses | Lessons/day | Retakes | Price | Days |
    /// |------|---------|-------------|---------|-------|------|
    /// | Free | 3 | 2 | 0 | 0 | 0 |
    /// | Basic | 10 | 10 | 2 | 9.99 | 30 |
    /// | Premium | 25 | unlimited | 5 | 19.99 | 30 |
    /// | Pro | unlimited | unlimited | unlimited | 39.99 | 30 |
    /// | Enterprise | unlimited | unlimited | unlimited | 99.99 | 365 |
    fn define(tier: MembershipTier) -> Self {
        match tier {
            MembershipTier::Free => Self {
                tier,
                display_name: "Free",
                price_cents: 0,
                duration_days: 0,
                features: FeatureBundle {
                    max_courses: Limit::AtMost(3),
                    max_lessons_per_day: Limit::AtMost(2),
                    test_retakes: Limit::AtMost(0),
                    ai_chat_access: false,
                    premium_courses: false,
                    offline_access: false,
                    priority_support: false,
                    custom_study_plans: false,
                    advanced_analytics: false,
                    group_study: false,
                    certification: false,
                    live_tutoring: false,
                    flashcards_unlimited: false,
                    progress_tracking: true,
                    export_certificates: false,
                },
            },
            MembershipTier::Basic => Self {
                tier,
                display_name: "Basic",
                price_cents: 999,
                duration_days: 30,
                features: FeatureBundle {
                    max_courses: Limit::AtMost(10),
                    max_lessons_per_day: Limit::AtMost(10),
                    test_retakes: Limit::AtMost(2),
                    ai_chat_access: false,
                    premium_courses: false,
                    offline_access: true,
                    priority_support: false,
                    custom_study_plans: false,
                    advanced_analytics: false,
                    group_study: true,
                    certification: false,
                    live_tutoring: false,
                    flashcards_unlimited: false,
                    progress_tracking: true,
                    export_certificates: false,
                },
            },
            MembershipTier::Premium => Self {
                tier,
                display_name: "Premium",
                price_cents: 1999,
                duration_days: 30,
                features: FeatureBundle {
                    max_courses: Limit::AtMost(25),
                    max_lessons_per_day: Limit::Unlimited,
                    test_retakes: Limit::AtMost(5),
                    ai_chat_access: true,
                    premium_courses: true,
                    offline_access: true,
                    priority_support: true,
                    custom_study_plans: true,
                    advanced_analytics: true,
                    group_study: true,
                    certification: true,
                    live_tutoring: false,
                    flashcards_unlimited: true,
                    progress_tracking: true,
                    export_certificates: true,
                },
            },
            MembershipTier::Pro => Self {
                tier,
                display_name: "Pro",
                price_cents: 3999,
                duration_days: 30,
                features: FeatureBundle::unrestricted(),
            },
            MembershipTier::Enterprise => Self {
                tier,
                display_name: "Enterprise",
                price_cents: 9999,
                duration_days: 365,
                features: FeatureBundle::unrestricted(),
            },
        }
    }
}

static CATALOG: Lazy<TierCatalog> = Lazy::new(TierCatalog::build);

/// Lookup table from tier to plan, total over [`MembershipTier`].
#[derive(Debug)]
pub struct TierCatalog {
    plans: HashMap<MembershipTier, TierPlan>,
}

impl TierCatalog {
    fn build() -> Self {
        let plans = MembershipTier::ALL
            .iter()
            .map(|tier| (*tier, TierPlan::define(*tier)))
            .collect();
        Self { plans }
    }

    /// The process-wide catalog.
    pub fn global() -> &'static TierCatalog {
        &CATALOG
    }

    /// Tier assigned to subscribers without a valid subscription.
    pub fn default_tier(&self) -> MembershipTier {
        MembershipTier::Free
    }

    /// Full plan for a tier.
    pub fn plan_of(&self, tier: MembershipTier) -> &TierPlan {
        // Built from MembershipTier::ALL, so every tier is present.
        self.plans
            .get(&tier)
            .expect("tier catalog is built from every MembershipTier variant")
    }

    /// Feature bundle for a tier.
    pub fn features_of(&self, tier: MembershipTier) -> &FeatureBundle {
        &self.plan_of(tier).features
    }

    /// Default tier together with its bundle.
    pub fn default_entitlement(&self) -> (MembershipTier, FeatureBundle) {
        let tier = self.default_tier();
        (tier, self.features_of(tier).clone())
    }

    /// Plans in catalog order, for pricing pages.
    pub fn plans(&self) -> Vec<&TierPlan> {
        MembershipTier::ALL.iter().map(|t| self.plan_of(*t)).collect()
    }
}
