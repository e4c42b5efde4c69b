//! Administrator back office: paginated order listing, status and payment
//! method edits, deletions.

pub mod error;
pub mod manager;
pub mod policy;

pub use error::AdminError;
pub use manager::AdminOrderManager;
pub use policy::TransitionPolicy;
