//! Session validation port for access token validation.
//!
//! This port defines the contract for validating access tokens and extracting
//! the subscriber identity and role. It is provider-agnostic: the HS256 JWT
//! validator and the mock validator both implement it.
//!
//! All implementations MUST validate:
//! - **Issuer (iss)**: Token must come from the expected identity provider
//! - **Audience (aud)**: Token must be intended for this application
//! - **Expiry (exp)**: Token must not be expired

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Validates access tokens and extracts subscriber identity.
///
/// HTTP middleware uses this to validate Bearer tokens before the Policy
/// Gate runs.
///
/// # Contract
///
/// Implementations must:
/// - Return `AuthError::InvalidToken` for malformed/bad signature tokens
/// - Return `AuthError::TokenExpired` for expired tokens
/// - Return `AuthError::ServiceUnavailable` for transient errors
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate an access token (without the "Bearer " prefix) and return
    /// the authenticated user.
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
