//! Membership tier definitions.
//!
//! Represents the subscription tier levels available on the platform.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Membership subscription tier.
///
/// Tiers are ordered informally by capability. There is deliberately no rank:
/// every entitlement is compared per feature, never as "tier >= tier".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipTier {
    /// Default tier for subscribers without a valid subscription.
    Free,
    Basic,
    Premium,
    Pro,
    Enterprise,
}

impl MembershipTier {
    /// Every tier, in catalog order.
    pub const ALL: [MembershipTier; 5] = [
        MembershipTier::Free,
        MembershipTier::Basic,
        MembershipTier::Premium,
        MembershipTier::Pro,
        MembershipTier::Enterprise,
    ];

    /// Returns true if this tier is a paid tier.
    pub fn is_paid(&self) -> bool {
        !matches!(self, MembershipTier::Free)
    }

    /// Returns the display name for this tier.
    pub fn display_name(&self) -> &'static str {
        match self {
            MembershipTier::Free => "Free",
            MembershipTier::Basic => "Basic",
            MembershipTier::Premium => "Premium",
            MembershipTier::Pro => "Pro",
            MembershipTier::Enterprise => "Enterprise",
        }
    }

    /// Returns the storage / wire identifier for this tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipTier::Free => "free",
            MembershipTier::Basic => "basic",
            MembershipTier::Premium => "premium",
            MembershipTier::Pro => "pro",
            MembershipTier::Enterprise => "enterprise",
        }
    }
}

impl fmt::Display for MembershipTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for MembershipTier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(MembershipTier::Free),
            "basic" => Ok(MembershipTier::Basic),
            "premium" => Ok(MembershipTier::Premium),
            "pro" => Ok(MembershipTier::Pro),
            "enterprise" => Ok(MembershipTier::Enterprise),
            other => Err(ValidationError::invalid_format(
                "tier",
                format!("unknown tier '{}'", other),
            )),
        }
    }
}
