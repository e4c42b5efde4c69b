use crate::backend::OrderBackend;
use crate::likes::store::{LikeStore, LikeStoreError, LikedSet};
use crate::model::{Product, ProductId};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, info, instrument, warn};

/// Message the UI shows once, then discards.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
}

/// How a toggle ended.
#[derive(Debug, Clone, PartialEq)]
pub enum LikeOutcome {
    /// The server accepted the new state; `likes` is its authoritative count.
    Confirmed { liked: bool, likes: u32 },
    /// The toggle failed and the liked set was restored to its pre-toggle snapshot.
    RolledBack { error: String },
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Optimistic like toggling for the displayed products.
///
/// The displayed state changes before the network round-trip. On success the
/// server's product replaces the local one; on failure only the durable liked set
/// is restored and re-read. Like counts already bumped in the displayed list stay
/// as they are until the next catalog load.
///
/// There is no per-product lock: a second toggle issued while the first is in
/// flight goes through, and whichever response lands last wins the display.
pub struct LikeToggleCoordinator {
    store: Arc<dyn LikeStore>,
    backend: Arc<dyn OrderBackend>,
    products: Mutex<Vec<Product>>,
    liked: Mutex<LikedSet>,
    notifications: Mutex<Vec<Notification>>,
}

impl LikeToggleCoordinator {
    pub fn new(
        store: Arc<dyn LikeStore>,
        backend: Arc<dyn OrderBackend>,
        products: Vec<Product>,
    ) -> Result<Self, LikeStoreError> {
        let liked = store.load()?;
        Ok(Self {
            store,
            backend,
            products: Mutex::new(products),
            liked: Mutex::new(liked),
            notifications: Mutex::new(Vec::new()),
        })
    }

    /// Replaces the displayed products, e.g. after the catalog was reloaded.
    pub fn set_products(&self, products: Vec<Product>) {
        *lock(&self.products) = products;
    }

    pub fn products(&self) -> Vec<Product> {
        lock(&self.products).clone()
    }

    pub fn product(&self, id: &ProductId) -> Option<Product> {
        lock(&self.products).iter().find(|p| &p.id == id).cloned()
    }

    pub fn is_liked(&self, id: &ProductId) -> bool {
        lock(&self.liked).contains(id)
    }

    /// Drains pending notifications.
    pub fn take_notifications(&self) -> Vec<Notification> {
        std::mem::take(&mut *lock(&self.notifications))
    }

    /// Flips the like state of `id`.
    #[instrument(skip(self))]
    pub async fn toggle(&self, id: ProductId) -> LikeOutcome {
        let snapshot = match self.store.load() {
            Ok(snapshot) => snapshot,
            Err(e) => return self.fail(&id, e.to_string(), None),
        };
        let liked = !snapshot.contains(&id);

        self.apply_optimistic(&id, liked);
        if let Err(e) = self.store.set(&id, liked) {
            return self.fail(&id, e.to_string(), Some(&snapshot));
        }

        match self.backend.toggle_like(id.clone(), liked).await {
            Ok(product) => {
                info!(product_id = %id, liked, likes = product.likes, "Like confirmed");
                let likes = product.likes;
                let mut products = lock(&self.products);
                if let Some(slot) = products.iter_mut().find(|p| p.id == id) {
                    *slot = product;
                }
                LikeOutcome::Confirmed { liked, likes }
            }
            Err(e) => self.fail(&id, e.to_string(), Some(&snapshot)),
        }
    }

    fn apply_optimistic(&self, id: &ProductId, liked: bool) {
        {
            let mut set = lock(&self.liked);
            if liked {
                set.insert(id.clone());
            } else {
                set.remove(id);
            }
        }
        let mut products = lock(&self.products);
        if let Some(product) = products.iter_mut().find(|p| &p.id == id) {
            product.likes = if liked {
                product.likes.saturating_add(1)
            } else {
                product.likes.saturating_sub(1)
            };
            debug!(product_id = %id, liked, likes = product.likes, "Optimistic like");
        }
    }

    /// Restores `snapshot` (when one was taken), re-reads the set and queues one notification.
    fn fail(&self, id: &ProductId, error: String, snapshot: Option<&LikedSet>) -> LikeOutcome {
        warn!(product_id = %id, %error, "Like toggle failed, rolling back");
        if let Some(snapshot) = snapshot {
            if let Err(e) = self.store.rollback(snapshot) {
                error!(error = %e, "Rollback of liked set failed");
            }
        }
        match self.store.load() {
            Ok(set) => *lock(&self.liked) = set,
            Err(e) => error!(error = %e, "Reloading liked set failed"),
        }
        lock(&self.notifications).push(Notification {
            message: format!("Could not update like: {error}"),
        });
        LikeOutcome::RolledBack { error }
    }
}
