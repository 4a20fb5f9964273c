//! Access policy services.
//!
//! - `SubscriptionResolver` - subscriber to tier and bundle, never failing
//! - `UsageCounter` - point-in-time consumption figures
//! - `ResourceAccessEvaluator` - tier, feature and limit rules
//! - `PolicyGate` - identity, admin bypass, evaluation and ownership

mod access_evaluator;
mod policy_gate;
mod subscription_resolver;
mod usage_counter;

pub use access_evaluator::{AccessEvaluator, ResourceAccessEvaluator};
pub use policy_gate::{AccessGrant, GateOutcome, PolicyGate};
pub use subscription_resolver::{SubscriptionLookup, SubscriptionResolver};
pub use usage_counter::UsageCounter;
