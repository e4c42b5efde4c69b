use crate::admin::{AdminError, TransitionPolicy};
use crate::backend::{ListQuery, OrderBackend, StatusFilter};
use crate::config::StorefrontConfig;
use crate::model::{Order, OrderId, OrderStatus, OrderUpdate, SessionUser};
use crate::session::SessionGate;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Back-office view over the orders: one page at a time, kept in sync with the
/// backend without refetching after every edit.
///
/// Edits are not versioned. Two administrators updating the same order both
/// succeed and the last write wins.
pub struct AdminOrderManager {
    session: Arc<dyn SessionGate>,
    backend: Arc<dyn OrderBackend>,
    policy: TransitionPolicy,
    page: u32,
    page_size: u32,
    status_filter: StatusFilter,
    search: String,
    orders: Vec<Order>,
    total: u64,
}

impl AdminOrderManager {
    pub fn new(session: Arc<dyn SessionGate>, backend: Arc<dyn OrderBackend>, page_size: u32) -> Self {
        Self {
            session,
            backend,
            policy: TransitionPolicy::default(),
            page: 1,
            page_size: page_size.max(1),
            status_filter: StatusFilter::All,
            search: String::new(),
            orders: Vec::new(),
            total: 0,
        }
    }

    pub fn from_config(session: Arc<dyn SessionGate>, backend: Arc<dyn OrderBackend>, config: &StorefrontConfig) -> Self {
        Self::new(session, backend, config.page_size).with_policy(config.status_policy)
    }

    pub fn with_policy(mut self, policy: TransitionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn status_filter(&self) -> StatusFilter {
        self.status_filter
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    /// Orders of the loaded page, before search filtering.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Total number of orders matching the status filter, across all pages.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.page_size))
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }

    /// Loaded orders whose customer name contains the search term, ignoring case.
    ///
    /// Only the loaded page is searched; matches on other pages are not shown.
    pub fn visible_orders(&self) -> Vec<&Order> {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return self.orders.iter().collect();
        }
        self.orders
            .iter()
            .filter(|order| {
                order
                    .customer_name()
                    .is_some_and(|name| name.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Sets the search term. Never queries the backend.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        debug!(search = %self.search, "Search term changed");
    }

    /// Fetches the current page with the current filter, replacing the loaded list.
    #[instrument(skip(self), fields(page = self.page, status = %self.status_filter))]
    pub async fn load(&mut self) -> Result<(), AdminError> {
        self.require_admin()?;
        let query = ListQuery::new(self.page, self.page_size, self.status_filter);
        let page = self.backend.list_orders(query).await?;
        info!(count = page.orders.len(), total = page.total, "Orders loaded");
        self.orders = page.orders;
        self.total = page.total;
        Ok(())
    }

    /// Moves to `page` (1-based) and loads it. Pages past the end are requested as is.
    pub async fn set_page(&mut self, page: u32) -> Result<(), AdminError> {
        self.page = page.max(1);
        self.load().await
    }

    /// Changes the status filter, goes back to the first page and loads it.
    pub async fn set_status_filter(&mut self, filter: StatusFilter) -> Result<(), AdminError> {
        self.status_filter = filter;
        self.page = 1;
        self.load().await
    }

    /// Sends `update` and replaces the loaded entry with the server's version.
    #[instrument(skip(self))]
    pub async fn update_order(&mut self, id: OrderId, update: OrderUpdate) -> Result<Order, AdminError> {
        self.require_admin()?;
        if let Some(next) = update.status {
            self.check_transition(&id, next)?;
        }

        let order = self.backend.update_order(id.clone(), update).await?;
        info!(order_id = %order.id, status = %order.status, payment_method = %order.payment_method, "Order updated");
        if let Some(slot) = self.orders.iter_mut().find(|o| o.id == id) {
            *slot = order.clone();
        }
        Ok(order)
    }

    /// Deletes the order, drops it from the loaded page and decrements the total.
    /// The page is not backfilled until the next load.
    #[instrument(skip(self))]
    pub async fn delete_order(&mut self, id: OrderId) -> Result<(), AdminError> {
        self.require_admin()?;
        self.backend.delete_order(id.clone()).await?;

        if let Some(index) = self.orders.iter().position(|o| o.id == id) {
            self.orders.remove(index);
        }
        self.total = self.total.saturating_sub(1);
        info!(order_id = %id, total = self.total, "Order deleted");
        Ok(())
    }

    fn require_admin(&self) -> Result<SessionUser, AdminError> {
        match self.session.current_user() {
            Some(user) if user.is_admin() => Ok(user),
            user => {
                warn!(user_id = ?user.map(|u| u.id), "Admin operation refused");
                Err(AdminError::Unauthorized)
            }
        }
    }

    fn check_transition(&self, id: &OrderId, next: OrderStatus) -> Result<(), AdminError> {
        let current = self.orders.iter().find(|o| &o.id == id).map(|o| o.status);
        match (self.policy, current) {
            (TransitionPolicy::Guarded, None) => Err(AdminError::NotLoaded(id.clone())),
            (policy, Some(from)) if !policy.allows(from, next) => {
                warn!(%from, to = %next, "Status change refused");
                Err(AdminError::IllegalTransition { from, to: next })
            }
            (_, Some(from)) if !from.can_transition_to(next) => {
                warn!(%from, to = %next, "Status change outside the nominal progression");
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
