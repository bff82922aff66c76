//! Order entity and the inputs used to place one.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

use super::product::{CartLine, StockReport};

/// Lifecycle state of an order. Orders are created as [`OrderStatus::Pending`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Shipped,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "paid" => Ok(OrderStatus::Paid),
            "shipped" => Ok(OrderStatus::Shipped),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingAddress {
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    /// ISO 3166-1 alpha-2 code.
    pub country: String,
}

/// Input data for placing an order.
///
/// Carries quantities only. Prices are always taken from the catalogue at
/// the moment the order is written.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer: CustomerDetails,
    pub shipping: ShippingAddress,
    pub note: Option<String>,
    pub lines: Vec<CartLine>,
}

/// A priced order line ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_id: i64,
    pub product_name: String,
    pub product_slug: String,
    pub unit_price_cents: i64,
    pub quantity: i32,
    pub line_total_cents: i64,
}

#[derive(Debug, Clone)]
pub struct OrderItem {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub product_slug: String,
    pub unit_price_cents: i64,
    pub quantity: i32,
    pub line_total_cents: i64,
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: i64,
    pub number: String,
    pub status: OrderStatus,
    pub customer: CustomerDetails,
    pub shipping: ShippingAddress,
    pub note: Option<String>,
    pub total_cents: i64,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Total number of units across all lines.
    pub fn unit_count(&self) -> i64 {
        self.items.iter().map(|i| i64::from(i.quantity)).sum()
    }
}

/// Result of an order placement attempt.
///
/// A rejection is a normal outcome, not an error: it carries the stock report
/// explaining which lines could not be satisfied.
#[derive(Debug, Clone)]
pub enum OrderOutcome {
    Placed(Order),
    Rejected(StockReport),
}
