//! Orders, their lines and status vocabulary.
//!
//! An [`Order`] is created once per successful submission and never mutated by the
//! customer side afterwards. Only the admin manager changes `status` and
//! `payment_method`, and only through the backend.

use crate::model::{OrderId, ProductId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Payment method recorded when the customer does not pick one.
pub const DEFAULT_PAYMENT_METHOD: &str = "unspecified";

/// Lifecycle status of an order.
///
/// The wire labels are the French labels the backend stores. Parsing also accepts
/// the English variant names so admin tooling can use either.
///
/// Nominal progression: `Pending -> Processing -> Shipped -> Delivered`, with
/// `Cancelled` reachable from any non-terminal status. Nothing enforces it at this
/// level, see [`OrderStatus::can_transition_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    #[serde(rename = "En attente", alias = "Pending")]
    Pending,
    #[serde(rename = "En traitement", alias = "Processing")]
    Processing,
    #[serde(rename = "Expédiée", alias = "Shipped")]
    Shipped,
    #[serde(rename = "Livrée", alias = "Delivered")]
    Delivered,
    #[serde(rename = "Annulée", alias = "Cancelled")]
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Label used on the wire and in the back office.
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "En attente",
            OrderStatus::Processing => "En traitement",
            OrderStatus::Shipped => "Expédiée",
            OrderStatus::Delivered => "Livrée",
            OrderStatus::Cancelled => "Annulée",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Whether `next` follows the nominal progression from `self`.
    ///
    /// Staying on the same status is always allowed.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        if *self == next {
            return true;
        }
        match (self, next) {
            (Pending, Processing) | (Processing, Shipped) | (Shipped, Delivered) => true,
            (from, Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.label() == s || status.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown order status: {s}"))
    }
}

/// One line of an order.
///
/// `price` is the unit price copied at submission time, so later catalog price
/// changes never alter a placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: f64,
}

impl OrderItem {
    pub fn new(product_id: impl Into<ProductId>, quantity: u32, price: f64) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            price,
        }
    }

    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Sum of `price * quantity` over the lines.
pub fn total_amount(items: &[OrderItem]) -> f64 {
    items.iter().map(OrderItem::subtotal).sum()
}

/// Optional delivery information attached to an order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<DateTime<Utc>>,
}

/// Customer as embedded in admin listings, where the backend populates `userId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(alias = "_id")]
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// The owning user of an order: a bare id, the populated customer document, or
/// nothing when the user was deleted (the backend then sends `null`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomerRef {
    Id(UserId),
    Populated(Customer),
    #[default]
    Unknown,
}

impl CustomerRef {
    pub fn id(&self) -> Option<&UserId> {
        match self {
            CustomerRef::Id(id) => Some(id),
            CustomerRef::Populated(customer) => Some(&customer.id),
            CustomerRef::Unknown => None,
        }
    }

    /// Display name, when the customer was populated with a non-empty one.
    pub fn name(&self) -> Option<&str> {
        match self {
            CustomerRef::Populated(customer) if !customer.name.trim().is_empty() => Some(&customer.name),
            _ => None,
        }
    }
}

fn default_payment_method() -> String {
    DEFAULT_PAYMENT_METHOD.to_string()
}

/// Represents a placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(alias = "_id")]
    pub id: OrderId,
    #[serde(rename = "userId", default)]
    pub customer: CustomerRef,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<DeliveryDetails>,
}

impl Order {
    /// Builds a freshly placed order from a creation payload.
    ///
    /// `total_amount` is computed here, once, from the submitted unit prices.
    pub fn placed(id: OrderId, params: OrderCreate, customer: CustomerRef) -> Self {
        Self {
            id,
            customer,
            total_amount: total_amount(&params.items),
            items: params.items,
            status: OrderStatus::Pending,
            payment_method: params
                .payment_method
                .unwrap_or_else(default_payment_method),
            created_at: Utc::now(),
            details: params.details,
        }
    }

    pub fn customer_name(&self) -> Option<&str> {
        self.customer.name()
    }
}

/// Payload for creating an order (`POST /api/orders`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<DeliveryDetails>,
}

impl OrderCreate {
    /// Total the backend is expected to record for this payload.
    pub fn total_amount(&self) -> f64 {
        total_amount(&self.items)
    }
}

/// Payload for updating an order (`PUT /api/orders/{id}`). Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

impl OrderUpdate {
    pub fn status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            payment_method: None,
        }
    }

    pub fn payment_method(method: impl Into<String>) -> Self {
        Self {
            status: None,
            payment_method: Some(method.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.payment_method.is_none()
    }
}
