//! In-memory adapters.

mod entitlement_store;

pub use entitlement_store::InMemoryEntitlementStore;
