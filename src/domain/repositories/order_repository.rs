//! Repository trait for order placement.

use async_trait::async_trait;

use crate::domain::entities::{NewOrder, Order, OrderOutcome};
use crate::error::AppError;

/// Repository interface for orders.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgOrderRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_order.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Places an order atomically.
    ///
    /// Stock is checked and decremented in the same transaction that writes
    /// the order, so concurrent orders can never oversell. Line prices come
    /// from the catalogue, not from the caller.
    ///
    /// # Returns
    ///
    /// - `Ok(OrderOutcome::Placed(order))` when every line could be satisfied
    /// - `Ok(OrderOutcome::Rejected(report))` when stock is short; nothing is written
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a line total overflows.
    /// Returns [`AppError::Conflict`] if no unique order number could be allocated.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create_order(&self, new_order: NewOrder) -> Result<OrderOutcome, AppError>;

    /// Finds an order with its items by public order number.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_number(&self, number: &str) -> Result<Option<Order>, AppError>;
}
