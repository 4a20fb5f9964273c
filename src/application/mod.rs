//! Application layer - Services, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! `access` holds the policy services; `handlers` exposes them as queries.

pub mod access;
pub mod handlers;

pub use access::{
    AccessEvaluator, AccessGrant, GateOutcome, PolicyGate, ResourceAccessEvaluator,
    SubscriptionLookup, SubscriptionResolver, UsageCounter,
};
pub use handlers::{
    CheckAccessHandler, CheckAccessQuery, CheckAccessResult, GetEntitlementsHandler,
    GetEntitlementsQuery, GetEntitlementsResult,
};
