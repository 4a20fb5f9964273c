//! Mapping of access failures to HTTP responses.
//!
//! | Failure | Status | Body |
//! |---------|--------|------|
//! | Unauthenticated | 401 | `{ code, message }` |
//! | Not found | 404 | `{ code, message }` |
//! | Policy denied | 403 | `{ code, reason, requiredTier?, currentTier? }` |
//! | Internal | 500 | `{ code, message }` |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::entitlements::{AccessError, MembershipTier, PolicyDenial};
use crate::domain::foundation::DomainError;

/// Generic error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Body of a 403, shaped for upgrade prompts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DenialResponse {
    pub code: &'static str,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_tier: Option<MembershipTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_tier: Option<MembershipTier>,
}

impl From<&PolicyDenial> for DenialResponse {
    fn from(denial: &PolicyDenial) -> Self {
        Self {
            code: denial.reason.code(),
            reason: denial.reason.reason(),
            required_tier: denial.required_tier,
            current_tier: denial.current_tier,
        }
    }
}

/// API error type that converts access failures to HTTP responses.
#[derive(Debug)]
pub struct AccessApiError {
    error: AccessError,
    verbose: bool,
}

impl AccessApiError {
    /// Includes internal error messages in 500 bodies.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn error(&self) -> &AccessError {
        &self.error
    }
}

impl From<AccessError> for AccessApiError {
    fn from(error: AccessError) -> Self {
        Self {
            error,
            verbose: false,
        }
    }
}

impl From<DomainError> for AccessApiError {
    fn from(err: DomainError) -> Self {
        AccessError::from(err).into()
    }
}

impl IntoResponse for AccessApiError {
    fn into_response(self) -> Response {
        let code = self.error.code();
        match &self.error {
            AccessError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new(code, "Authentication required")),
            )
                .into_response(),
            AccessError::NotFound { .. } => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(code, self.error.to_string())),
            )
                .into_response(),
            AccessError::Denied(denial) => {
                (StatusCode::FORBIDDEN, Json(DenialResponse::from(denial))).into_response()
            }
            AccessError::Internal(message) => {
                tracing::error!(error = %message, "Access request failed");
                let message = if self.verbose {
                    message.clone()
                } else {
                    "An internal error occurred".to_string()
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(code, message)),
                )
                    .into_response()
            }
        }
    }
}
