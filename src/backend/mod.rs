//! # Order Backend
//!
//! The remote order store is an HTTP collaborator that applies each write
//! atomically. Every component of the core talks to it through the
//! [`OrderBackend`] trait:
//!
//! | Operation | Endpoint |
//! |---|---|
//! | [`create_order`](OrderBackend::create_order) | `POST /api/orders` |
//! | [`list_orders`](OrderBackend::list_orders) | `GET /api/orders?page=&limit=&status=` |
//! | [`update_order`](OrderBackend::update_order) | `PUT /api/orders/{id}` |
//! | [`delete_order`](OrderBackend::delete_order) | `DELETE /api/orders/{id}` |
//! | [`toggle_like`](OrderBackend::toggle_like) | `POST /api/products/{id}/toggle-like` |
//!
//! Three implementations ship with the crate:
//! - [`HttpOrderBackend`]: the real client (reqwest + JSON).
//! - [`InMemoryBackend`]: actor-backed store used by the demo binary and integration tests.
//! - [`MockBackend`]: expectation queue for unit tests.
//!
//! There is no version token on orders. Two concurrent edits of the same order
//! are applied last-write-wins.

pub mod error;
pub mod http;
pub mod memory;
pub mod mock;

pub use error::*;
pub use http::HttpOrderBackend;
pub use memory::InMemoryBackend;
pub use mock::{BackendCall, MockBackend};

use crate::model::{Order, OrderCreate, OrderId, OrderStatus, OrderUpdate, Product, ProductId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// The order endpoints of the storefront API.
#[async_trait]
pub trait OrderBackend: Send + Sync {
    /// Place an order. The backend computes and stores `totalAmount`.
    async fn create_order(&self, order: OrderCreate) -> Result<Order, BackendError>;

    /// One page of orders, newest first, with the total matching the filter.
    async fn list_orders(&self, query: ListQuery) -> Result<OrderPage, BackendError>;

    /// Change status and/or payment method; returns the stored representation.
    async fn update_order(&self, id: OrderId, update: OrderUpdate) -> Result<Order, BackendError>;

    async fn delete_order(&self, id: OrderId) -> Result<(), BackendError>;

    /// Set the like state of a product; returns the product with the authoritative count.
    async fn toggle_like(&self, id: ProductId, like: bool) -> Result<Product, BackendError>;
}

/// Status filter of the admin listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: OrderStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }

    /// Value of the `status` query parameter; `None` for `all`, which omits it.
    pub fn as_query(&self) -> Option<&'static str> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Only(status) => Some(status.label()),
        }
    }
}

impl From<OrderStatus> for StatusFilter {
    fn from(status: OrderStatus) -> Self {
        StatusFilter::Only(status)
    }
}

impl Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => Display::fmt(status, f),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") || s.trim().is_empty() {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

/// Parameters of `GET /api/orders`. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub status: StatusFilter,
}

impl ListQuery {
    pub fn new(page: u32, limit: u32, status: StatusFilter) -> Self {
        Self { page, limit, status }
    }

    /// Number of entries preceding the requested page.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1) as usize * self.limit as usize
    }
}

/// Response of `GET /api/orders`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_filter_parsing() {
        assert_eq!("all".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!(
            "Expédiée".parse::<StatusFilter>(),
            Ok(StatusFilter::Only(OrderStatus::Shipped))
        );
        assert!("bogus".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn status_filter_query_value() {
        assert_eq!(StatusFilter::All.as_query(), None);
        assert_eq!(StatusFilter::from(OrderStatus::Pending).as_query(), Some("En attente"));
        assert!(StatusFilter::All.matches(OrderStatus::Cancelled));
        assert!(!StatusFilter::Only(OrderStatus::Pending).matches(OrderStatus::Cancelled));
    }

    #[test]
    fn offset_is_one_based() {
        assert_eq!(ListQuery::new(1, 10, StatusFilter::All).offset(), 0);
        assert_eq!(ListQuery::new(3, 10, StatusFilter::All).offset(), 20);
        assert_eq!(ListQuery::new(0, 10, StatusFilter::All).offset(), 0);
    }
}
