//! Order placement service.

use std::sync::Arc;

use serde_json::json;

use super::catalog_service::ensure_lines;
use crate::domain::entities::{NewOrder, Order, OrderOutcome};
use crate::domain::repositories::OrderRepository;
use crate::error::AppError;
use crate::utils::order_number::is_order_number;

/// Service for placing and looking up orders.
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
}

impl OrderService {
    /// Creates a new order service.
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }

    /// Places an order.
    ///
    /// Stock is verified and reserved atomically by the repository. Unit prices
    /// are read from the catalogue.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the cart is empty or a quantity is
    /// not positive.
    /// Returns [`AppError::Conflict`] if any line cannot be satisfied; the
    /// details carry the full stock report.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn place_order(&self, new_order: NewOrder) -> Result<Order, AppError> {
        ensure_lines(&new_order.lines)?;

        match self.orders.create_order(new_order).await? {
            OrderOutcome::Placed(order) => {
                metrics::counter!("orders_placed_total").increment(1);
                tracing::info!(
                    order_number = %order.number,
                    total_cents = order.total_cents,
                    units = order.unit_count(),
                    "Order placed"
                );
                Ok(order)
            }
            OrderOutcome::Rejected(report) => {
                metrics::counter!("orders_rejected_total").increment(1);
                tracing::info!(
                    problems = report.problems().count(),
                    "Order rejected for stock"
                );

                let details = serde_json::to_value(&report).unwrap_or_else(|_| json!({}));
                Err(AppError::conflict("Insufficient stock", details))
            }
        }
    }

    /// Retrieves an order by its public number.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the number is malformed or unknown.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn find_order(&self, number: &str) -> Result<Order, AppError> {
        let not_found = || AppError::not_found("Order not found", json!({ "number": number }));

        if !is_order_number(number) {
            return Err(not_found());
        }

        self.orders.find_by_number(number).await?.ok_or_else(not_found)
    }
}
