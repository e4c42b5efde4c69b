//! Error types for the admin order manager.

use crate::backend::BackendError;
use crate::model::{OrderId, OrderStatus};
use thiserror::Error;

/// Errors returned by [`AdminOrderManager`](crate::admin::AdminOrderManager).
///
/// Every variant but `Backend` is raised locally, before any network call.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AdminError {
    /// The session user is missing or not an administrator.
    #[error("Administrator access required")]
    Unauthorized,

    /// The guarded policy refused the status change.
    #[error("Cannot change order status from {from} to {to}")]
    IllegalTransition { from: OrderStatus, to: OrderStatus },

    /// The guarded policy needs the current status, but the order is not on the loaded page.
    #[error("Order {0} is not loaded")]
    NotLoaded(OrderId),

    #[error(transparent)]
    Backend(#[from] BackendError),
}
