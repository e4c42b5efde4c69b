//! Process wiring: building the components over one backend, stopping the
//! in-memory stores, and the tracing subscriber.

pub mod storefront;
pub mod tracing;

pub use self::storefront::{LifecycleError, Storefront};
pub use self::tracing::setup_tracing;
