//! API route configuration.
//!
//! The storefront API is public; there is no authentication layer.

use crate::api::handlers::{
    cart_validate_handler, categories_select_handler, create_order_handler,
    product_detail_handler, product_list_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Catalogue read routes and the cart stock check.
///
/// # Endpoints
///
/// - `GET  /categories/select` - Category options grouped by top-level category
/// - `GET  /products`          - Public product listing (filters, sorting, pagination)
/// - `GET  /products/{slug}`   - Public product detail
/// - `POST /cart/validate`     - Stock check for a cart
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/categories/select", get(categories_select_handler))
        .route("/products", get(product_list_handler))
        .route("/products/{slug}", get(product_detail_handler))
        .route("/cart/validate", post(cart_validate_handler))
}

/// Order placement.
///
/// # Endpoints
///
/// - `POST /orders` - Place an order
pub fn order_routes() -> Router<AppState> {
    Router::new().route("/orders", post(create_order_handler))
}
