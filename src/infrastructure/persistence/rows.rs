//! Row types decoded by the PostgreSQL repositories and their domain mapping.

use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::FromRow;

use crate::domain::entities::{
    Category, CustomerDetails, Order, OrderItem, Product, ShippingAddress, StockLevel,
};
use crate::error::AppError;

/// Columns of [`CategoryRow`].
pub(crate) const CATEGORY_COLUMNS: &str = "id, parent_id, name, slug, sort_order, created_at";

/// Product columns joined with the category slug.
///
/// Expects `products p LEFT JOIN categories c ON c.id = p.category_id`.
pub(crate) const PRODUCT_COLUMNS: &str = "p.id, p.category_id, c.slug AS category_slug, p.name, \
     p.slug, p.description, p.price_cents, p.stock, p.is_public, p.created_at, p.updated_at";

pub(crate) const STOCK_COLUMNS: &str =
    "id AS product_id, name, slug, price_cents, stock AS available, is_public";

pub(crate) const ORDER_COLUMNS: &str = "id, number, status, customer_name, customer_email, \
     customer_phone, address_line1, address_line2, city, postal_code, country, note, \
     total_cents, created_at";

pub(crate) const ORDER_ITEM_COLUMNS: &str = "id, order_id, product_id, product_name, product_slug, \
     unit_price_cents, quantity, line_total_cents";

#[derive(Debug, FromRow)]
pub(crate) struct CategoryRow {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub name: String,
    pub slug: String,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(r: CategoryRow) -> Self {
        Category::new(r.id, r.parent_id, r.name, r.slug, r.sort_order, r.created_at)
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct ProductRow {
    pub id: i64,
    pub category_id: Option<i64>,
    pub category_slug: Option<String>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub stock: i32,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Product {
            id: r.id,
            category_id: r.category_id,
            category_slug: r.category_slug,
            name: r.name,
            slug: r.slug,
            description: r.description,
            price_cents: r.price_cents,
            stock: r.stock,
            is_public: r.is_public,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct StockRow {
    pub product_id: i64,
    pub name: String,
    pub slug: String,
    pub price_cents: i64,
    pub available: i32,
    pub is_public: bool,
}

impl From<StockRow> for StockLevel {
    fn from(r: StockRow) -> Self {
        StockLevel {
            product_id: r.product_id,
            name: r.name,
            slug: r.slug,
            price_cents: r.price_cents,
            available: r.available,
            is_public: r.is_public,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct OrderRow {
    pub id: i64,
    pub number: String,
    pub status: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub note: Option<String>,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl OrderRow {
    /// Assembles the domain order from this row and its items.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the stored status is unknown.
    pub fn into_order(self, items: Vec<OrderItem>) -> Result<Order, AppError> {
        let status = self.status.parse().map_err(|e: String| {
            AppError::internal(
                "Stored order has an unknown status",
                json!({ "order_id": self.id, "reason": e }),
            )
        })?;

        Ok(Order {
            id: self.id,
            number: self.number,
            status,
            customer: CustomerDetails {
                name: self.customer_name,
                email: self.customer_email,
                phone: self.customer_phone,
            },
            shipping: ShippingAddress {
                line1: self.address_line1,
                line2: self.address_line2,
                city: self.city,
                postal_code: self.postal_code,
                country: self.country,
            },
            note: self.note,
            total_cents: self.total_cents,
            items,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct OrderItemRow {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub product_slug: String,
    pub unit_price_cents: i64,
    pub quantity: i32,
    pub line_total_cents: i64,
}

impl From<OrderItemRow> for OrderItem {
    fn from(r: OrderItemRow) -> Self {
        OrderItem {
            id: r.id,
            product_id: r.product_id,
            product_name: r.product_name,
            product_slug: r.product_slug,
            unit_price_cents: r.unit_price_cents,
            quantity: r.quantity,
            line_total_cents: r.line_total_cents,
        }
    }
}
