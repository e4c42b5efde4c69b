//! Product likes: the durable liked set and the optimistic toggle over it.

pub mod coordinator;
pub mod store;

pub use coordinator::{LikeOutcome, LikeToggleCoordinator, Notification};
pub use store::{FileLikeStore, LikeStore, LikeStoreError, LikedSet, MemoryLikeStore};
