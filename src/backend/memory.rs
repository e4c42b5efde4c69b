//! # In-Memory Order Backend
//!
//! An [`OrderBackend`] that keeps orders and products in two [`ResourceActor`]s.
//! It behaves like the remote store for everything the core observes:
//!
//! - create checks the customer, each line's quantity against stock, reserves the
//!   stock and computes `totalAmount` from the submitted unit prices;
//! - list returns newest first, filtered by status, sliced by page;
//! - update applies status and payment method, last-write-wins;
//! - toggle-like moves the product's counter, never below zero.
//!
//! The order store depends on the product store through its context
//! ([`OrderStoreContext`]), injected when the actor is started.

use crate::backend::{BackendError, ListQuery, OrderBackend, OrderPage};
use crate::framework::{ActorEntity, FrameworkError, ResourceActor, ResourceClient};
use crate::model::{
    Customer, CustomerRef, Order, OrderCreate, OrderId, OrderUpdate, Product, ProductCreate,
    ProductId, UserId,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

/// Known customers, used to validate and populate `userId` on new orders.
pub type CustomerDirectory = Arc<RwLock<HashMap<UserId, Customer>>>;

/// Custom actions for stored products.
#[derive(Debug, Clone)]
pub enum ProductAction {
    /// Takes units out of stock; fails if not enough are available.
    ReserveStock(u32),
    /// Puts units back, used when a multi-line order is rejected half-way.
    ReleaseStock(u32),
    /// Sets the like state for the caller and moves the counter accordingly.
    ToggleLike(bool),
}

#[async_trait]
impl ActorEntity for Product {
    type Id = ProductId;
    type CreateParams = ProductCreate;
    type UpdateParams = ();
    type Action = ProductAction;
    type ActionResult = Product;
    type Context = ();

    fn from_create_params(id: ProductId, params: ProductCreate) -> Result<Self, String> {
        if params.price < 0.0 || !params.price.is_finite() {
            return Err(format!("Invalid price: {}", params.price));
        }
        Ok(Product::new(id, params.name, params.price, params.stock))
    }

    async fn on_update(&mut self, _update: (), _ctx: &()) -> Result<(), String> {
        Ok(())
    }

    async fn handle_action(&mut self, action: ProductAction, _ctx: &()) -> Result<Product, String> {
        match action {
            ProductAction::ReserveStock(quantity) => {
                if quantity > self.stock {
                    return Err(format!(
                        "Insufficient stock for {}: requested {}, available {}",
                        self.name, quantity, self.stock
                    ));
                }
                self.stock -= quantity;
            }
            ProductAction::ReleaseStock(quantity) => {
                self.stock = self.stock.saturating_add(quantity);
            }
            ProductAction::ToggleLike(true) => {
                self.likes = self.likes.saturating_add(1);
            }
            ProductAction::ToggleLike(false) => {
                self.likes = self.likes.saturating_sub(1);
            }
        }
        Ok(self.clone())
    }
}

/// Dependencies of the order store.
#[derive(Clone)]
pub struct OrderStoreContext {
    pub products: ResourceClient<Product>,
    pub customers: CustomerDirectory,
}

impl OrderStoreContext {
    async fn release(&self, reserved: &[(ProductId, u32)]) {
        for (product_id, quantity) in reserved {
            if let Err(e) = self
                .products
                .perform_action(product_id.clone(), ProductAction::ReleaseStock(*quantity))
                .await
            {
                warn!(%product_id, error = %e, "Failed to release stock");
            }
        }
    }
}

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type CreateParams = OrderCreate;
    type UpdateParams = OrderUpdate;
    type Action = ();
    type ActionResult = ();
    type Context = OrderStoreContext;

    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, String> {
        if params.items.is_empty() {
            return Err("An order needs at least one item".to_string());
        }
        if let Some(item) = params.items.iter().find(|item| item.quantity == 0) {
            return Err(format!("Invalid quantity for product {}", item.product_id));
        }
        let customer = CustomerRef::Id(params.user_id.clone());
        Ok(Order::placed(id, params, customer))
    }

    /// Resolves the customer, then reserves stock line by line. A failing line
    /// releases what earlier lines reserved.
    async fn on_create(&mut self, ctx: &OrderStoreContext) -> Result<(), String> {
        let user_id = self
            .customer
            .id()
            .cloned()
            .ok_or_else(|| "An order needs a user".to_string())?;
        let customer = ctx
            .customers
            .read()
            .map_err(|_| "Customer directory unavailable".to_string())?
            .get(&user_id)
            .cloned()
            .ok_or_else(|| format!("Unknown user: {user_id}"))?;
        self.customer = CustomerRef::Populated(customer);

        let mut reserved = Vec::with_capacity(self.items.len());
        for item in &self.items {
            let result = ctx
                .products
                .perform_action(item.product_id.clone(), ProductAction::ReserveStock(item.quantity))
                .await;
            if let Err(e) = result {
                ctx.release(&reserved).await;
                return Err(match e {
                    FrameworkError::NotFound(id) => format!("Unknown product: {id}"),
                    other => other.to_string(),
                });
            }
            reserved.push((item.product_id.clone(), item.quantity));
        }
        Ok(())
    }

    async fn on_update(&mut self, update: OrderUpdate, _ctx: &OrderStoreContext) -> Result<(), String> {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(method) = update.payment_method {
            if method.trim().is_empty() {
                return Err("Payment method cannot be empty".to_string());
            }
            self.payment_method = method;
        }
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &OrderStoreContext) -> Result<(), String> {
        Ok(())
    }
}

fn sequence_ids<T: From<String>>(prefix: &'static str) -> impl Fn() -> T + Send + Sync + 'static {
    let counter = Arc::new(AtomicU64::new(1));
    // Zero-padded so ids sort in creation order.
    move || T::from(format!("{prefix}_{:06}", counter.fetch_add(1, Ordering::SeqCst)))
}

fn map_framework_error(e: FrameworkError) -> BackendError {
    match e {
        FrameworkError::NotFound(id) => BackendError::Remote {
            status: 404,
            message: format!("Not found: {id}"),
        },
        FrameworkError::Rejected(message) => BackendError::Remote { status: 400, message },
        closed => BackendError::Network(closed.to_string()),
    }
}

/// Actor-backed [`OrderBackend`].
#[derive(Clone)]
pub struct InMemoryBackend {
    orders: ResourceClient<Order>,
    products: ResourceClient<Product>,
    customers: CustomerDirectory,
}

impl InMemoryBackend {
    /// Spawns the product and order stores and returns the backend plus the
    /// actor task handles. The actors stop once every clone of the backend is dropped.
    pub fn spawn() -> (Self, Vec<JoinHandle<()>>) {
        let (product_actor, products) = ResourceActor::new(32, sequence_ids::<ProductId>("product"));
        let (order_actor, orders) = ResourceActor::new(32, sequence_ids::<OrderId>("order"));
        let customers = CustomerDirectory::default();

        let product_handle = tokio::spawn(product_actor.run(()));
        let order_handle = tokio::spawn(order_actor.run(OrderStoreContext {
            products: products.clone(),
            customers: customers.clone(),
        }));

        let backend = Self {
            orders,
            products,
            customers,
        };
        (backend, vec![order_handle, product_handle])
    }

    /// Registers a customer so orders placed under its id are accepted.
    pub fn register_customer(&self, customer: Customer) {
        debug!(user_id = %customer.id, "Customer registered");
        self.customers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(customer.id.clone(), customer);
    }

    pub async fn add_product(&self, params: ProductCreate) -> Result<Product, BackendError> {
        self.products.create(params).await.map_err(map_framework_error)
    }

    pub async fn product(&self, id: ProductId) -> Result<Option<Product>, BackendError> {
        self.products.get(id).await.map_err(map_framework_error)
    }

    pub async fn order(&self, id: OrderId) -> Result<Option<Order>, BackendError> {
        self.orders.get(id).await.map_err(map_framework_error)
    }
}

#[async_trait]
impl OrderBackend for InMemoryBackend {
    #[instrument(skip(self, order), fields(user_id = %order.user_id))]
    async fn create_order(&self, order: OrderCreate) -> Result<Order, BackendError> {
        self.orders.create(order).await.map_err(map_framework_error)
    }

    #[instrument(skip(self))]
    async fn list_orders(&self, query: ListQuery) -> Result<OrderPage, BackendError> {
        let mut orders: Vec<Order> = self
            .orders
            .list()
            .await
            .map_err(map_framework_error)?
            .into_iter()
            .filter(|order| query.status.matches(order.status))
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));

        let total = orders.len() as u64;
        let orders = orders
            .into_iter()
            .skip(query.offset())
            .take(query.limit as usize)
            .collect();
        Ok(OrderPage { orders, total })
    }

    #[instrument(skip(self))]
    async fn update_order(&self, id: OrderId, update: OrderUpdate) -> Result<Order, BackendError> {
        self.orders.update(id, update).await.map_err(map_framework_error)
    }

    #[instrument(skip(self))]
    async fn delete_order(&self, id: OrderId) -> Result<(), BackendError> {
        self.orders.delete(id).await.map_err(map_framework_error)
    }

    #[instrument(skip(self))]
    async fn toggle_like(&self, id: ProductId, like: bool) -> Result<Product, BackendError> {
        self.products
            .perform_action(id, ProductAction::ToggleLike(like))
            .await
            .map_err(map_framework_error)
    }
}
