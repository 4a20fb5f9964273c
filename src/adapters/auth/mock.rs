//! Mock session validator for tests and local development.
//!
//! # Example
//!
//! ```ignore
//! use learnhub_access::adapters::auth::MockSessionValidator;
//! use learnhub_access::domain::foundation::Role;
//!
//! let validator = MockSessionValidator::new()
//!     .with_test_user("student-token", "learner-1")
//!     .with_role_user("admin-token", "ops-1", Role::Admin);
//!
//! let user = validator.validate("admin-token").await?;
//! assert!(user.is_admin());
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, Role, SubscriberId};
use crate::ports::SessionValidator;

/// Mock session validator.
///
/// Stores a map of tokens to users. Tokens not in the map return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    /// Returned for every validation when set.
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a valid token that maps to a user.
    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.add_token(token, user);
        self
    }

    /// Adds a valid token for a student with the given id.
    pub fn with_test_user(self, token: impl Into<String>, subscriber_id: impl Into<String>) -> Self {
        self.with_role_user(token, subscriber_id, Role::Student)
    }

    /// Adds a valid token for a user with the given id and role.
    ///
    /// Panics on a blank id; this is a test helper.
    pub fn with_role_user(
        self,
        token: impl Into<String>,
        subscriber_id: impl Into<String>,
        role: Role,
    ) -> Self {
        let subscriber_id = subscriber_id.into();
        let user = AuthenticatedUser::new(
            SubscriberId::new(&subscriber_id).expect("test subscriber id must not be blank"),
            format!("{}@test.example.com", subscriber_id),
            Some(format!("Test User {}", subscriber_id)),
            role,
        );
        self.with_user(token, user)
    }

    /// Forces all validations to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        if let Ok(mut forced) = self.force_error.write() {
            *forced = Some(error);
        }
        self
    }

    /// Registers a new valid token at runtime.
    pub fn add_token(&self, token: impl Into<String>, user: AuthenticatedUser) {
        if let Ok(mut tokens) = self.tokens.write() {
            tokens.insert(token.into(), user);
        }
    }

    /// Removes a token, making it invalid.
    pub fn remove_token(&self, token: &str) {
        if let Ok(mut tokens) = self.tokens.write() {
            tokens.remove(token);
        }
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let poisoned = || AuthError::service_unavailable("mock validator lock poisoned");

        if let Some(error) = self.force_error.read().map_err(|_| poisoned())?.clone() {
            return Err(error);
        }

        self.tokens
            .read()
            .map_err(|_| poisoned())?
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}
