//! Catalog products.
//!
//! The core only reads products: the draft controller copies `price` into the
//! order line at submission time, and the like coordinator replaces `likes` with
//! the server's authoritative count.
//!
//! # Actor Framework
//! In the in-memory backend this struct implements the
//! [`ActorEntity`](crate::framework::ActorEntity) trait, see
//! [`crate::backend::memory`].
use crate::model::ProductId;
use serde::{Deserialize, Serialize};

/// Represents a product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(alias = "_id")]
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub likes: u32,
}

impl Product {
    /// Creates a new Product instance with no likes.
    ///
    /// # Arguments
    /// * `id` - Backend identifier
    /// * `name` - Display name
    /// * `price` - Unit price
    /// * `stock` - Available stock
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: f64, stock: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            stock,
            likes: 0,
        }
    }

    /// Bounds a requested quantity to what can be ordered: at least 1, at most the stock.
    ///
    /// A product with zero stock still yields 1, so the submission is rejected by
    /// the backend instead of silently ordering nothing.
    pub fn clamp_quantity(&self, requested: i64) -> u32 {
        let upper = i64::from(self.stock.max(1));
        requested.clamp(1, upper) as u32
    }
}

/// Payload for creating a product in the in-memory store.
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub name: String,
    pub price: f64,
    pub stock: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_quantity_bounds_to_stock() {
        let product = Product::new("p1", "Chaise", 1000.0, 3);
        assert_eq!(product.clamp_quantity(2), 2);
        assert_eq!(product.clamp_quantity(0), 1);
        assert_eq!(product.clamp_quantity(-4), 1);
        assert_eq!(product.clamp_quantity(9), 3);
    }

    #[test]
    fn deserializes_backend_document() {
        let json = r#"{"_id":"p9","name":"Table","price":250.5,"stock":4,"likes":7,"category":"salon"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::from("p9"));
        assert_eq!(product.stock, 4);
        assert_eq!(product.likes, 7);
    }
}
