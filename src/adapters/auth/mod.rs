//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` port:
//!
//! - `mock` - Token table for tests and local development
//! - `jwt` - HS256 JWT validation against a shared secret

mod jwt;
mod mock;

pub use jwt::{AccessClaims, JwtConfig, JwtSessionValidator};
pub use mock::MockSessionValidator;
