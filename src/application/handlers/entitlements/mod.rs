//! Entitlement query handlers.
//!
//! - Get the current subscriber's tier, bundle, usage and remaining allowance
//! - Pre-check access to a resource without failing the request

mod check_access;
mod get_entitlements;

pub use check_access::{CheckAccessHandler, CheckAccessQuery, CheckAccessResult};
pub use get_entitlements::{
    GetEntitlementsHandler, GetEntitlementsQuery, GetEntitlementsResult, RemainingAllowance,
    UsageSnapshot,
};
