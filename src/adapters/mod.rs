//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Session validators (HS256 JWT, mock)
//! - `memory` - In-memory entitlement store for tests and local runs
//! - `postgres` - sqlx-backed entitlement store
//! - `http` - axum routes and middleware

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;

pub use auth::{JwtConfig, JwtSessionValidator, MockSessionValidator};
pub use memory::InMemoryEntitlementStore;
pub use postgres::PostgresEntitlementStore;
