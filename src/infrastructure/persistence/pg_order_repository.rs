//! PostgreSQL implementation of order placement.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;

use super::rows::{ORDER_COLUMNS, ORDER_ITEM_COLUMNS, OrderItemRow, OrderRow, STOCK_COLUMNS, StockRow};
use crate::domain::catalog::{check_stock, order_total, price_lines};
use crate::domain::entities::{NewOrder, Order, OrderItem, OrderOutcome, OrderStatus, StockLevel};
use crate::domain::repositories::{OrderRepository, Reader};
use crate::error::AppError;
use crate::utils::db_error::is_unique_violation_on;
use crate::utils::order_number::generate_order_number;

/// Unique constraint on `orders.number`.
const ORDER_NUMBER_CONSTRAINT: &str = "orders_number_key";

/// Attempts at allocating an unused order number.
const MAX_NUMBER_ATTEMPTS: u32 = 5;

/// PostgreSQL repository for orders.
///
/// Placement runs in a single transaction that locks the ordered product rows
/// (`FOR UPDATE`, in id order so concurrent orders cannot deadlock), checks and
/// decrements stock, and writes the order with its items.
pub struct PgOrderRepository {
    pool: Arc<PgPool>,
    next_number: NumberSource,
}

/// Produces candidate order numbers.
type NumberSource = Box<dyn Fn() -> String + Send + Sync>;

impl PgOrderRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self::with_number_source(pool, generate_order_number)
    }

    /// Creates a repository that draws order numbers from `source`.
    ///
    /// Placement retries with a fresh number from `source` while the number
    /// is already taken.
    pub fn with_number_source<F>(pool: Arc<PgPool>, source: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self {
            pool,
            next_number: Box::new(source),
        }
    }

    /// Runs one placement transaction with the given order number.
    ///
    /// Returns `Ok(None)` if the number is already taken; the transaction is
    /// rolled back and the caller may retry with another number.
    async fn try_place(
        &self,
        new_order: &NewOrder,
        number: &str,
    ) -> Result<Option<OrderOutcome>, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut ids: Vec<i64> = new_order.lines.iter().map(|l| l.product_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let levels: Vec<StockLevel> = sqlx::query_as::<_, StockRow>(&format!(
            "SELECT {STOCK_COLUMNS} FROM products WHERE id = ANY($1) ORDER BY id FOR UPDATE"
        ))
        .bind(&ids[..])
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(StockLevel::from)
        .collect();

        let report = check_stock(&new_order.lines, &levels);
        if !report.valid {
            tx.rollback().await?;
            return Ok(Some(OrderOutcome::Rejected(report)));
        }

        let priced = price_lines(&new_order.lines, &levels)?;
        let total_cents = order_total(&priced)?;

        let inserted = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO orders ( \
                 number, status, customer_name, customer_email, customer_phone, \
                 address_line1, address_line2, city, postal_code, country, note, total_cents \
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(number)
        .bind(OrderStatus::Pending.as_str())
        .bind(&new_order.customer.name)
        .bind(&new_order.customer.email)
        .bind(&new_order.customer.phone)
        .bind(&new_order.shipping.line1)
        .bind(&new_order.shipping.line2)
        .bind(&new_order.shipping.city)
        .bind(&new_order.shipping.postal_code)
        .bind(&new_order.shipping.country)
        .bind(&new_order.note)
        .bind(total_cents)
        .fetch_one(&mut *tx)
        .await;

        let order_row = match inserted {
            Ok(row) => row,
            Err(e) if is_unique_violation_on(&e, ORDER_NUMBER_CONSTRAINT) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut items = Vec::with_capacity(priced.len());
        for item in priced {
            let row = sqlx::query_as::<_, OrderItemRow>(&format!(
                "INSERT INTO order_items ( \
                     order_id, product_id, product_name, product_slug, \
                     unit_price_cents, quantity, line_total_cents \
                 ) VALUES ($1, $2, $3, $4, $5, $6, $7) \
                 RETURNING {ORDER_ITEM_COLUMNS}"
            ))
            .bind(order_row.id)
            .bind(item.product_id)
            .bind(&item.product_name)
            .bind(&item.product_slug)
            .bind(item.unit_price_cents)
            .bind(item.quantity)
            .bind(item.line_total_cents)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query("UPDATE products SET stock = stock - $2, updated_at = NOW() WHERE id = $1")
                .bind(item.product_id)
                .bind(item.quantity)
                .execute(&mut *tx)
                .await?;

            items.push(OrderItem::from(row));
        }

        tx.commit().await?;

        order_row.into_order(items).map(|o| Some(OrderOutcome::Placed(o)))
    }

    /// Loads the items of the given orders, grouped by order id.
    async fn items_for(&self, order_ids: &[i64]) -> Result<HashMap<i64, Vec<OrderItem>>, AppError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(&format!(
            "SELECT {ORDER_ITEM_COLUMNS} FROM order_items \
             WHERE order_id = ANY($1) ORDER BY id"
        ))
        .bind(order_ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        let mut grouped: HashMap<i64, Vec<OrderItem>> = HashMap::new();
        for row in rows {
            grouped.entry(row.order_id).or_default().push(row.into());
        }

        Ok(grouped)
    }

    async fn assemble(&self, rows: Vec<OrderRow>) -> Result<Vec<Order>, AppError> {
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut items = self.items_for(&ids).await?;

        rows.into_iter()
            .map(|row| {
                let order_items = items.remove(&row.id).unwrap_or_default();
                row.into_order(order_items)
            })
            .collect()
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create_order(&self, new_order: NewOrder) -> Result<OrderOutcome, AppError> {
        for attempt in 1..=MAX_NUMBER_ATTEMPTS {
            let number = (self.next_number)();

            match self.try_place(&new_order, &number).await? {
                Some(outcome) => return Ok(outcome),
                None => {
                    tracing::warn!(attempt, number, "Order number collision, retrying");
                }
            }
        }

        Err(AppError::conflict(
            "Could not allocate a unique order number",
            json!({ "attempts": MAX_NUMBER_ATTEMPTS }),
        ))
    }

    async fn find_by_number(&self, number: &str) -> Result<Option<Order>, AppError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE number = $1"
        ))
        .bind(number)
        .fetch_optional(self.pool.as_ref())
        .await?;

        match row {
            Some(row) => Ok(self.assemble(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl Reader<Order> for PgOrderRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Order>, AppError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        match row {
            Some(row) => Ok(self.assemble(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Order>, AppError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        self.assemble(rows).await
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
