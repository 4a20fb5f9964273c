//! HTTP adapter for entitlement endpoints.
//!
//! - `GET /api/entitlements/me` - Entitlement summary
//! - `GET /api/entitlements/access/:resource_type` - Capability pre-check
//! - `GET /api/entitlements/access/:resource_type/:resource_id` - Instance pre-check

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::EntitlementsAppState;
pub use routes::{entitlements_router, entitlements_routes};
