//! Runtime switches for the access service.

use serde::Deserialize;

/// Switches that change gate wiring or response shape.
///
/// An omitted section keeps ownership enforced and HTTP tracing on.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    /// Include internal error detail in 500 bodies. Rejected in production.
    pub verbose_errors: bool,

    /// Wrap the router in a `TraceLayer`.
    pub enable_tracing: bool,

    /// Add the ownership stage to the Policy Gate.
    pub enforce_ownership: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            verbose_errors: false,
            enable_tracing: true,
            enforce_ownership: true,
        }
    }
}
