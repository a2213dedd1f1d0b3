//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the application's use cases.

pub mod advisory;
pub mod fleet;
pub mod invocation;
pub mod reconcile;
pub mod registry;

pub use advisory::{AdvisoryCycle, AdvisoryCycleFactory};
pub use fleet::FleetService;
pub use invocation::{InvocationClient, RetryPolicy};
pub use reconcile::Reconciler;
pub use registry::FleetRegistry;
