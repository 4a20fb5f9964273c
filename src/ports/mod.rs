//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Store Ports
//!
//! - `SubscriptionReader` - Valid subscription lookup
//! - `ResourceCatalog` - Existence of courses, lessons, tests and exercises
//! - `UsageReader` - Enrollment, completion and attempt counts
//! - `OwnershipChecker` - Enrollment in a resource's owning course
//!
//! ## Auth Ports
//!
//! - `SessionValidator` - Access token to subscriber identity

mod ownership_checker;
mod resource_catalog;
mod session_validator;
mod subscription_reader;
mod usage_reader;

pub use ownership_checker::{Ownership, OwnershipChecker};
pub use resource_catalog::{CourseInfo, LessonInfo, ResourceCatalog};
pub use session_validator::SessionValidator;
pub use subscription_reader::SubscriptionReader;
pub use usage_reader::UsageReader;
