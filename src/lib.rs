//! LearnHub Access - tiered entitlement and resource access policy engine.
//!
//! Decides whether a subscriber may reach a learning resource or use a
//! platform capability, based on their membership tier, the tier's feature
//! bundle and their current usage.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
