//! Authentication types for the domain layer.
//!
//! These types represent a subscriber identity that was already resolved by
//! the identity provider. They have **no external dependencies** - any token
//! format can populate them via the `SessionValidator` port.
//!
//! # Example
//!
//! ```ignore
//! // In HTTP middleware, after token validation:
//! let user = AuthenticatedUser::new(
//!     SubscriberId::new("user-123")?,
//!     "user@example.com",
//!     Some("Alice".to_string()),
//!     Role::Student,
//! );
//!
//! request.extensions_mut().insert(user);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{SubscriberId, ValidationError};

/// Platform role of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular learner. Access is governed by subscription tier.
    #[default]
    Student,
    /// Content author. Governed by subscription tier like a student.
    Instructor,
    /// Platform administrator. Bypasses every entitlement check.
    Admin,
}

impl Role {
    /// Returns true if this role bypasses entitlement checks entirely.
    pub fn is_administrative(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Instructor => "instructor",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "student" | "user" => Ok(Role::Student),
            "instructor" | "tutor" => Ok(Role::Instructor),
            "admin" => Ok(Role::Admin),
            other => Err(ValidationError::invalid_format(
                "role",
                format!("unknown role '{}'", other),
            )),
        }
    }
}

/// Authenticated subscriber extracted from a validated token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The unique subscriber identifier from the identity provider.
    pub id: SubscriberId,

    /// User's email address from the token claims.
    pub email: String,

    /// Display name if available.
    pub display_name: Option<String>,

    /// Platform role.
    pub role: Role,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(
        id: SubscriberId,
        email: impl Into<String>,
        display_name: Option<String>,
        role: Role,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            display_name,
            role,
        }
    }

    /// Returns true if this user bypasses entitlement checks.
    pub fn is_admin(&self) -> bool {
        self.role.is_administrative()
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired (separate from InvalidToken for specific handling).
    #[error("Token expired")]
    TokenExpired,

    /// The authentication service is unavailable (network, config, etc.).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }
}
