//! Public catalogue service.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::{CartLine, CategoryGroup, Product, ProductFilter, StockReport};
use crate::domain::repositories::{Paginated, ProductRepository};
use crate::error::AppError;
use crate::utils::slug::is_valid_slug;

/// Service behind the storefront's read endpoints.
///
/// Validates inputs the repository must never see (malformed slugs, empty
/// carts, inverted price ranges) and maps absent rows to [`AppError::NotFound`].
pub struct CatalogService {
    products: Arc<dyn ProductRepository>,
}

impl CatalogService {
    /// Creates a new catalog service.
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }

    /// Returns the category tree grouped for a select control.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn categories_for_select(&self) -> Result<Vec<CategoryGroup>, AppError> {
        self.products.categories_for_select().await
    }

    /// Lists public products.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `min_price` exceeds `max_price`.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn public_products(
        &self,
        filter: ProductFilter,
    ) -> Result<Paginated<Product>, AppError> {
        if let (Some(min), Some(max)) = (filter.min_price, filter.max_price)
            && min > max
        {
            return Err(AppError::bad_request(
                "min_price must not exceed max_price",
                json!({ "min_price": min, "max_price": max }),
            ));
        }

        self.products.public_products(filter).await
    }

    /// Retrieves a public product by slug.
    ///
    /// Malformed slugs are answered without a database round trip.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the slug is malformed or no public
    /// product has it.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn public_product_by_slug(&self, slug: &str) -> Result<Product, AppError> {
        let not_found = || AppError::not_found("Product not found", json!({ "slug": slug }));

        if !is_valid_slug(slug) {
            return Err(not_found());
        }

        self.products
            .public_product_by_slug(slug)
            .await?
            .ok_or_else(not_found)
    }

    /// Checks a cart against current stock.
    ///
    /// An insufficient cart is not an error; inspect [`StockReport::valid`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the cart is empty or a quantity is
    /// not positive.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn validate_cart_stock(&self, lines: &[CartLine]) -> Result<StockReport, AppError> {
        ensure_lines(lines)?;
        self.products.validate_cart_stock(lines).await
    }

    /// Counts public products. Doubles as a database liveness probe.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn count_public_products(&self) -> Result<i64, AppError> {
        self.products.count_public().await
    }
}

/// Rejects empty carts and non-positive quantities.
pub(crate) fn ensure_lines(lines: &[CartLine]) -> Result<(), AppError> {
    if lines.is_empty() {
        return Err(AppError::bad_request(
            "Cart must contain at least one item",
            json!({}),
        ));
    }

    if let Some(line) = lines.iter().find(|l| l.quantity <= 0) {
        return Err(AppError::bad_request(
            "Quantity must be positive",
            json!({ "product_id": line.product_id, "quantity": line.quantity }),
        ));
    }

    Ok(())
}
