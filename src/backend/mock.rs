//! # Mock Backend
//!
//! Utilities for testing the controllers without a server.
//!
//! Queue the replies the backend should give, in order, then hand the mock to the
//! component under test. Every call pops the next expectation; a call that does not
//! match it panics. [`MockBackend::verify`] asserts nothing is left over, and
//! [`MockBackend::calls`] returns what was actually sent.
//!
//! ```ignore
//! let mock = Arc::new(MockBackend::new());
//! mock.expect_create_order().return_ok(order);
//! mock.expect_toggle_like("p1").delayed(Duration::from_millis(20)).return_err(error);
//!
//! // ... drive the controller ...
//! mock.verify();
//! ```

use crate::backend::{BackendError, ListQuery, OrderBackend, OrderPage};
use crate::model::{Order, OrderCreate, OrderId, OrderUpdate, Product, ProductId};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A request received by the mock, with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    CreateOrder(OrderCreate),
    ListOrders(ListQuery),
    UpdateOrder(OrderId, OrderUpdate),
    DeleteOrder(OrderId),
    ToggleLike(ProductId, bool),
}

/// The reply queued for one expected call.
#[derive(Debug)]
enum Reply {
    CreateOrder(Result<Order, BackendError>),
    ListOrders(Result<OrderPage, BackendError>),
    UpdateOrder(Result<Order, BackendError>),
    DeleteOrder(Result<(), BackendError>),
    ToggleLike(Result<Product, BackendError>),
}

#[derive(Debug)]
struct Expectation {
    id: Option<String>,
    delay: Option<Duration>,
    reply: Reply,
}

type Queue = Arc<Mutex<VecDeque<Expectation>>>;

/// An [`OrderBackend`] answering from a queue of expectations.
#[derive(Default)]
pub struct MockBackend {
    expectations: Queue,
    calls: Arc<Mutex<Vec<BackendCall>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_create_order(&self) -> ExpectationBuilder<Order> {
        self.builder(None, Reply::CreateOrder)
    }

    pub fn expect_list_orders(&self) -> ExpectationBuilder<OrderPage> {
        self.builder(None, Reply::ListOrders)
    }

    pub fn expect_update_order(&self, id: impl Into<OrderId>) -> ExpectationBuilder<Order> {
        self.builder(Some(id.into().0), Reply::UpdateOrder)
    }

    pub fn expect_delete_order(&self, id: impl Into<OrderId>) -> ExpectationBuilder<()> {
        self.builder(Some(id.into().0), Reply::DeleteOrder)
    }

    pub fn expect_toggle_like(&self, id: impl Into<ProductId>) -> ExpectationBuilder<Product> {
        self.builder(Some(id.into().0), Reply::ToggleLike)
    }

    fn builder<T>(&self, id: Option<String>, wrap: fn(Result<T, BackendError>) -> Reply) -> ExpectationBuilder<T> {
        ExpectationBuilder {
            expectations: self.expectations.clone(),
            id,
            delay: None,
            wrap,
        }
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }

    /// Records the call and pops the next expectation, checking the id when one was given.
    async fn next(&self, call: BackendCall, id: Option<&str>) -> Reply {
        self.calls.lock().unwrap().push(call.clone());
        let expectation = self
            .expectations
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("Unexpected call: {call:?}"));
        if let (Some(expected), Some(actual)) = (expectation.id.as_deref(), id) {
            assert_eq!(expected, actual, "Expectation mismatch for {call:?}");
        }
        if let Some(delay) = expectation.delay {
            tokio::time::sleep(delay).await;
        }
        expectation.reply
    }
}

/// Builder for one expectation.
pub struct ExpectationBuilder<T> {
    expectations: Queue,
    id: Option<String>,
    delay: Option<Duration>,
    wrap: fn(Result<T, BackendError>) -> Reply,
}

impl<T> ExpectationBuilder<T> {
    /// Holds the reply back for `delay`, to interleave concurrent calls.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: T) {
        self.push(Ok(value));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: BackendError) {
        self.push(Err(error));
    }

    fn push(self, result: Result<T, BackendError>) {
        self.expectations.lock().unwrap().push_back(Expectation {
            id: self.id,
            delay: self.delay,
            reply: (self.wrap)(result),
        });
    }
}

#[async_trait]
impl OrderBackend for MockBackend {
    async fn create_order(&self, order: OrderCreate) -> Result<Order, BackendError> {
        match self.next(BackendCall::CreateOrder(order), None).await {
            Reply::CreateOrder(result) => result,
            other => panic!("Expected create_order, queued reply was {other:?}"),
        }
    }

    async fn list_orders(&self, query: ListQuery) -> Result<OrderPage, BackendError> {
        match self.next(BackendCall::ListOrders(query), None).await {
            Reply::ListOrders(result) => result,
            other => panic!("Expected list_orders, queued reply was {other:?}"),
        }
    }

    async fn update_order(&self, id: OrderId, update: OrderUpdate) -> Result<Order, BackendError> {
        let key = id.0.clone();
        match self.next(BackendCall::UpdateOrder(id, update), Some(&key)).await {
            Reply::UpdateOrder(result) => result,
            other => panic!("Expected update_order, queued reply was {other:?}"),
        }
    }

    async fn delete_order(&self, id: OrderId) -> Result<(), BackendError> {
        let key = id.0.clone();
        match self.next(BackendCall::DeleteOrder(id), Some(&key)).await {
            Reply::DeleteOrder(result) => result,
            other => panic!("Expected delete_order, queued reply was {other:?}"),
        }
    }

    async fn toggle_like(&self, id: ProductId, like: bool) -> Result<Product, BackendError> {
        let key = id.0.clone();
        match self.next(BackendCall::ToggleLike(id, like), Some(&key)).await {
            Reply::ToggleLike(result) => result,
            other => panic!("Expected toggle_like, queued reply was {other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::StatusFilter;

    #[tokio::test]
    async fn test_replies_in_order_and_records_calls() {
        let mock = MockBackend::new();
        mock.expect_list_orders().return_ok(OrderPage::default());
        mock.expect_delete_order("o1").return_err(BackendError::remote(404, ""));

        let page = mock.list_orders(ListQuery::new(1, 10, StatusFilter::All)).await.unwrap();
        assert!(page.orders.is_empty());
        let err = mock.delete_order(OrderId::from("o1")).await.unwrap_err();
        assert_eq!(err.status(), Some(404));

        assert_eq!(
            mock.calls(),
            vec![
                BackendCall::ListOrders(ListQuery::new(1, 10, StatusFilter::All)),
                BackendCall::DeleteOrder(OrderId::from("o1")),
            ]
        );
        mock.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "Not all expectations were met")]
    async fn test_verify_reports_leftovers() {
        let mock = MockBackend::new();
        mock.expect_delete_order("o1").return_ok(());
        mock.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "Unexpected call")]
    async fn test_unexpected_call_panics() {
        let mock = MockBackend::new();
        let _ = mock.delete_order(OrderId::from("o1")).await;
    }
}
