//! Order records.
//!
//! Line items are snapshotted at order time (id, name, unit price, image) so
//! historical orders stay immutable when the live catalog changes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payment method recorded on every order in this implementation.
pub const PAYMENT_CASH_ON_DELIVERY: &str = "Cash on Delivery";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status: '{other}'")),
        }
    }
}

/// One order line, captured at order time and decoupled from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: u32,
    /// Unit price at the time of ordering.
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
}

impl OrderItem {
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// An order as submitted. `customer_id` is absent for guest checkout;
/// shipping address and payment method are free text; `total` is computed by
/// the submitting side and stored as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Public identifier assigned at creation time.
    pub public_id: Uuid,
    #[serde(default)]
    pub customer_id: Option<String>,
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: Option<String>,
    pub customer_phone: String,
    pub date: DateTime<Utc>,
    pub status: OrderStatus,
    pub total: Decimal,
    pub shipping_address: String,
    pub payment_method: String,
    pub items: Vec<OrderItem>,
}
