//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors, auth)
//! - `entitlements` - Tiers, feature bundles, subscriptions and access decisions

pub mod entitlements;
pub mod foundation;
