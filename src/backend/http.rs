//! # HTTP Order Backend
//!
//! [`OrderBackend`] over the storefront's REST API. Every call is a single attempt:
//! no retry, no backoff. A non-2xx answer becomes [`BackendError::Remote`] carrying
//! the server's message.

use crate::backend::{BackendError, ListQuery, OrderBackend, OrderPage};
use crate::config::{StorefrontConfig, DEFAULT_API_URL};
use crate::model::{Order, OrderCreate, OrderId, OrderUpdate, Product, ProductId};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Serialize)]
struct LikeBody {
    like: bool,
}

/// Client for the storefront REST API.
#[derive(Clone)]
pub struct HttpOrderBackend {
    client: Client,
    base_url: Url,
}

impl HttpOrderBackend {
    /// Builds a client for `base_url`, optionally authenticated with a bearer token.
    pub fn new(base_url: &str, token: Option<&str>, timeout: Duration) -> Result<Self, BackendError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| BackendError::Network(format!("invalid API URL {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::Network(format!("invalid API URL {base_url:?}: not a base URL")));
        }
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| BackendError::Network(format!("invalid auth header: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| BackendError::Network(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    /// Client for `config.api_url`, or the local default API when it is unset.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, BackendError> {
        let url = config.api_url.as_deref().unwrap_or(DEFAULT_API_URL);
        Self::new(url, config.api_token.as_deref(), config.request_timeout)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// `base_url` followed by `segments`, each percent-encoded as a single path segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so the segments are always editable.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn orders_url(&self) -> Url {
        self.endpoint(&["api", "orders"])
    }

    fn order_url(&self, id: &OrderId) -> Url {
        self.endpoint(&["api", "orders", id.as_str()])
    }

    fn toggle_like_url(&self, id: &ProductId) -> Url {
        self.endpoint(&["api", "products", id.as_str(), "toggle-like"])
    }

    async fn send(request: RequestBuilder) -> Result<Response, BackendError> {
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "Request failed");
            BackendError::Network(e.to_string())
        })?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let err = BackendError::remote(status.as_u16(), &body);
        warn!(status = status.as_u16(), error = %err, "Request rejected");
        Err(err)
    }

    async fn json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, BackendError> {
        Self::send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }
}

/// Query pairs for `GET /api/orders`. The status parameter is omitted for `all`.
pub fn list_query_pairs(query: &ListQuery) -> Vec<(&'static str, String)> {
    let mut pairs = vec![("page", query.page.to_string()), ("limit", query.limit.to_string())];
    if let Some(status) = query.status.as_query() {
        pairs.push(("status", status.to_string()));
    }
    pairs
}

#[async_trait]
impl OrderBackend for HttpOrderBackend {
    #[instrument(skip(self, order), fields(user_id = %order.user_id))]
    async fn create_order(&self, order: OrderCreate) -> Result<Order, BackendError> {
        debug!(?order, "create_order called");
        let created: Order = Self::json(self.client.post(self.orders_url()).json(&order)).await?;
        info!(order_id = %created.id, total = created.total_amount, "Order created");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn list_orders(&self, query: ListQuery) -> Result<OrderPage, BackendError> {
        let request = self.client.get(self.orders_url()).query(&list_query_pairs(&query));
        let page: OrderPage = Self::json(request).await?;
        debug!(count = page.orders.len(), total = page.total, "Orders listed");
        Ok(page)
    }

    #[instrument(skip(self))]
    async fn update_order(&self, id: OrderId, update: OrderUpdate) -> Result<Order, BackendError> {
        let updated: Order = Self::json(self.client.put(self.order_url(&id)).json(&update)).await?;
        info!(order_id = %updated.id, status = %updated.status, "Order updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete_order(&self, id: OrderId) -> Result<(), BackendError> {
        Self::send(self.client.delete(self.order_url(&id))).await?;
        info!(order_id = %id, "Order deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn toggle_like(&self, id: ProductId, like: bool) -> Result<Product, BackendError> {
        let request = self.client.post(self.toggle_like_url(&id)).json(&LikeBody { like });
        let product: Product = Self::json(request).await?;
        debug!(product_id = %product.id, likes = product.likes, "Like toggled");
        Ok(product)
    }
}
