//! Application handlers.
//!
//! Query handlers that orchestrate the access services for the HTTP layer.

pub mod entitlements;

pub use entitlements::{
    CheckAccessHandler, CheckAccessQuery, CheckAccessResult, GetEntitlementsHandler,
    GetEntitlementsQuery, GetEntitlementsResult, RemainingAllowance, UsageSnapshot,
};
