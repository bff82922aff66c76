//! Repository trait for the public catalogue.

use async_trait::async_trait;

use super::base::Paginated;
use crate::domain::entities::{CartLine, CategoryGroup, Product, ProductFilter, StockReport};
use crate::error::AppError;

/// Read model of the storefront catalogue.
///
/// Only public products are ever returned by these operations. Stock checks
/// follow [`crate::domain::catalog::check_stock`].
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgProductRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_product.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Returns all categories grouped for a select control.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn categories_for_select(&self) -> Result<Vec<CategoryGroup>, AppError>;

    /// Lists public products matching `filter`.
    ///
    /// # Returns
    ///
    /// The requested page plus the total number of matches.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn public_products(&self, filter: ProductFilter) -> Result<Paginated<Product>, AppError>;

    /// Finds a public product by slug.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Product))` if a public product has this slug
    /// - `Ok(None)` otherwise, including hidden products
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn public_product_by_slug(&self, slug: &str) -> Result<Option<Product>, AppError>;

    /// Compares requested quantities with current stock.
    ///
    /// Never fails for unknown products; they are reported as unavailable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn validate_cart_stock(&self, lines: &[CartLine]) -> Result<StockReport, AppError>;

    /// Counts public products.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_public(&self) -> Result<i64, AppError>;
}
