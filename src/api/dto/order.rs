//! DTOs for order placement.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

use super::cart::CartItemRequest;
use crate::domain::entities::{
    CartLine, CustomerDetails, NewOrder, Order, OrderItem, ShippingAddress,
};

/// ISO 3166-1 alpha-2 country code.
static COUNTRY_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]{2}$").unwrap());

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CustomerRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(max = 32))]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ShippingAddressRequest {
    #[validate(length(min = 1, max = 255))]
    pub line1: String,

    #[validate(length(max = 255))]
    pub line2: Option<String>,

    #[validate(length(min = 1, max = 120))]
    pub city: String,

    #[validate(length(min = 1, max = 20))]
    pub postal_code: String,

    #[validate(regex(path = "*COUNTRY_REGEX", message = "country must be an ISO 3166-1 alpha-2 code"))]
    pub country: String,
}

/// Body of `POST /api/orders`.
///
/// Prices are never accepted from the client.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(nested)]
    pub customer: CustomerRequest,

    #[validate(nested)]
    pub shipping: ShippingAddressRequest,

    #[validate(length(max = 1000))]
    pub note: Option<String>,

    #[validate(length(min = 1, max = 100, message = "items must contain 1 to 100 lines"))]
    #[validate(nested)]
    pub items: Vec<CartItemRequest>,
}

/// Trims a value and drops it if nothing remains.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl CreateOrderRequest {
    pub fn into_new_order(self) -> NewOrder {
        let lines = self.items.iter().map(CartLine::from).collect();

        NewOrder {
            customer: CustomerDetails {
                name: self.customer.name.trim().to_string(),
                email: self.customer.email.trim().to_string(),
                phone: non_blank(self.customer.phone),
            },
            shipping: ShippingAddress {
                line1: self.shipping.line1.trim().to_string(),
                line2: non_blank(self.shipping.line2),
                city: self.shipping.city.trim().to_string(),
                postal_code: self.shipping.postal_code.trim().to_string(),
                country: self.shipping.country,
            },
            note: non_blank(self.note),
            lines,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    pub product_id: i64,
    pub product_name: String,
    pub product_slug: String,
    pub unit_price_cents: i64,
    pub quantity: i32,
    pub line_total_cents: i64,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            product_id: item.product_id,
            product_name: item.product_name,
            product_slug: item.product_slug,
            unit_price_cents: item.unit_price_cents,
            quantity: item.quantity,
            line_total_cents: item.line_total_cents,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ShippingAddressResponse {
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// A placed order as returned to the client.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub number: String,
    pub status: String,
    pub customer: CustomerResponse,
    pub shipping: ShippingAddressResponse,
    pub note: Option<String>,
    pub items: Vec<OrderItemResponse>,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            number: order.number,
            status: order.status.to_string(),
            customer: CustomerResponse {
                name: order.customer.name,
                email: order.customer.email,
                phone: order.customer.phone,
            },
            shipping: ShippingAddressResponse {
                line1: order.shipping.line1,
                line2: order.shipping.line2,
                city: order.shipping.city,
                postal_code: order.shipping.postal_code,
                country: order.shipping.country,
            },
            note: order.note,
            items: order.items.into_iter().map(Into::into).collect(),
            total_cents: order.total_cents,
            created_at: order.created_at,
        }
    }
}
