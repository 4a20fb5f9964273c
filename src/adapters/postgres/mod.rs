//! PostgreSQL adapters - Database implementations for the read ports.
//!
//! - `PostgresEntitlementStore` - subscriptions, catalog, usage and ownership

mod entitlement_store;

pub use entitlement_store::PostgresEntitlementStore;
