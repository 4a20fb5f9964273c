//! Boundary failures of an access request.

use thiserror::Error;

use crate::domain::foundation::DomainError;

use super::{AccessDecision, DenialReason, MembershipTier, ResourceTarget};

/// Policy denial lifted out of an [`AccessDecision`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDenial {
    pub reason: DenialReason,
    pub required_tier: Option<MembershipTier>,
    pub current_tier: Option<MembershipTier>,
}

/// Why the Policy Gate refused a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// No subscriber identity on the request.
    #[error("authentication required")]
    Unauthenticated,

    #[error("{resource_type} not found")]
    NotFound {
        resource_type: String,
        resource_id: Option<String>,
    },

    #[error("access denied: {}", .0.reason)]
    Denied(PolicyDenial),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AccessError {
    /// Converts a decision into the boundary outcome for `target`.
    pub fn check(decision: AccessDecision, target: &ResourceTarget) -> Result<(), AccessError> {
        match decision.denial() {
            None => Ok(()),
            Some(DenialReason::NotFound) => Err(AccessError::NotFound {
                resource_type: target.resource_type.to_string(),
                resource_id: target.resource_id.as_ref().map(ToString::to_string),
            }),
            Some(reason) => Err(AccessError::Denied(PolicyDenial {
                reason: reason.clone(),
                required_tier: decision.required_tier(),
                current_tier: decision.current_tier(),
            })),
        }
    }

    /// Machine-readable code for response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AccessError::Unauthenticated => "UNAUTHORIZED",
            AccessError::NotFound { .. } => "NOT_FOUND",
            AccessError::Denied(_) => "FORBIDDEN",
            AccessError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<DomainError> for AccessError {
    fn from(err: DomainError) -> Self {
        AccessError::Internal(err.to_string())
    }
}
