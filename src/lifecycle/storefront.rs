use crate::admin::AdminOrderManager;
use crate::backend::{BackendError, HttpOrderBackend, InMemoryBackend, OrderBackend};
use crate::config::StorefrontConfig;
use crate::draft::OrderDraftController;
use crate::likes::{FileLikeStore, LikeStore, LikeStoreError, LikeToggleCoordinator, MemoryLikeStore};
use crate::model::Product;
use crate::session::StaticSession;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Store task failed: {0}")]
    TaskFailed(String),
}

/// Wires the session, the backend and the liked set into the three components.
///
/// ```ignore
/// let storefront = Storefront::in_memory(StorefrontConfig::default());
/// let mut draft = storefront.draft_controller();
/// let mut admin = storefront.admin_manager();
/// // ...
/// drop((draft, admin));
/// storefront.shutdown().await?;
/// ```
pub struct Storefront {
    config: StorefrontConfig,
    session: Arc<StaticSession>,
    backend: Arc<dyn OrderBackend>,
    store: Option<InMemoryBackend>,
    likes: Arc<dyn LikeStore>,
    handles: Vec<JoinHandle<()>>,
}

impl Storefront {
    /// Starts the in-memory order and product stores.
    pub fn in_memory(config: StorefrontConfig) -> Self {
        let (store, handles) = InMemoryBackend::spawn();
        info!(stores = handles.len(), "In-memory stores started");
        Self::assemble(config, Arc::new(store.clone()), Some(store), handles)
    }

    /// Talks to the REST API when `config.api_url` is set, otherwise runs in memory.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, BackendError> {
        if config.api_url.is_some() {
            Self::connect(config)
        } else {
            Ok(Self::in_memory(config))
        }
    }

    /// Talks to the REST API at `config.api_url`, or the local default API when unset.
    pub fn connect(config: StorefrontConfig) -> Result<Self, BackendError> {
        let backend = HttpOrderBackend::from_config(&config)?;
        info!(api_url = %backend.base_url(), "Connected to order API");
        Ok(Self::assemble(config, Arc::new(backend), None, Vec::new()))
    }

    fn assemble(
        config: StorefrontConfig,
        backend: Arc<dyn OrderBackend>,
        store: Option<InMemoryBackend>,
        handles: Vec<JoinHandle<()>>,
    ) -> Self {
        let likes: Arc<dyn LikeStore> = match &config.likes_path {
            Some(path) => Arc::new(FileLikeStore::new(path)),
            None => Arc::new(MemoryLikeStore::new()),
        };
        Self {
            config,
            session: Arc::new(StaticSession::anonymous()),
            backend,
            store,
            likes,
            handles,
        }
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    pub fn session(&self) -> &StaticSession {
        &self.session
    }

    pub fn backend(&self) -> Arc<dyn OrderBackend> {
        self.backend.clone()
    }

    /// The in-memory store, for seeding customers and products. `None` over HTTP.
    pub fn store(&self) -> Option<&InMemoryBackend> {
        self.store.as_ref()
    }

    pub fn draft_controller(&self) -> OrderDraftController {
        OrderDraftController::new(self.session.clone(), self.backend.clone())
    }

    pub fn like_coordinator(&self, products: Vec<Product>) -> Result<LikeToggleCoordinator, LikeStoreError> {
        LikeToggleCoordinator::new(self.likes.clone(), self.backend.clone(), products)
    }

    pub fn admin_manager(&self) -> AdminOrderManager {
        AdminOrderManager::from_config(self.session.clone(), self.backend.clone(), &self.config)
    }

    /// Stops the in-memory stores and waits for them.
    ///
    /// The store tasks exit once every backend handle is gone, so components created
    /// from this storefront must be dropped before calling this.
    pub async fn shutdown(self) -> Result<(), LifecycleError> {
        info!("Shutting down storefront...");
        drop(self.backend);
        drop(self.store);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Store task failed: {:?}", e);
                return Err(LifecycleError::TaskFailed(format!("{e:?}")));
            }
        }

        info!("Storefront shutdown complete.");
        Ok(())
    }
}
