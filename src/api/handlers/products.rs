//! Handlers for the public product listing and product detail.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::pagination::PaginationMeta;
use crate::api::dto::products::{ProductItem, ProductListQuery, ProductListResponse};
use crate::api::extract::ApiQuery;
use crate::error::AppError;
use crate::infrastructure::cache::keys::{PRODUCT_DETAIL_TTL_SECONDS, product_key};
use crate::infrastructure::cache::{get_json, set_json};
use crate::state::AppState;

/// Lists public products with filtering, sorting and pagination.
///
/// # Endpoint
///
/// `GET /api/products`
///
/// # Query Parameters
///
/// - `page` (optional): Page number (default: 1)
/// - `per_page` (optional): Items per page (default: 20, max: 100)
/// - `search` (optional): Case-insensitive match on name or description
/// - `category` (optional): Category slug, descendants included
/// - `min_price`, `max_price` (optional): Inclusive bounds in cents
/// - `in_stock` (optional): `true` to hide sold-out products
/// - `sort` (optional): `newest` (default), `price_asc`, `price_desc`, `name`
///
/// # Errors
///
/// Returns 400 Bad Request if a parameter is malformed or out of range.
pub async fn product_list_handler(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ProductListQuery>,
) -> Result<Json<ProductListResponse>, AppError> {
    let (filter, page) = params.to_filter()?;

    let result = state.catalog_service.public_products(filter).await?;

    Ok(Json(ProductListResponse {
        items: result.items.into_iter().map(ProductItem::from).collect(),
        pagination: PaginationMeta::new(page, result.total),
    }))
}

/// Returns a single public product.
///
/// # Endpoint
///
/// `GET /api/products/{slug}`
///
/// # Cache
///
/// Cached per slug for [`PRODUCT_DETAIL_TTL_SECONDS`]. Entries are dropped
/// when an order changes the product's stock. A read that started before the
/// order committed may still write the old stock back after that
/// invalidation; such an entry lives until the short TTL runs out.
///
/// # Errors
///
/// Returns 404 Not Found if no public product has this slug.
pub async fn product_detail_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProductItem>, AppError> {
    let cache_key = product_key(&slug);

    if let Some(cached) = get_json(state.cache.as_ref(), &cache_key).await {
        return Ok(Json(cached));
    }

    let product = state.catalog_service.public_product_by_slug(&slug).await?;
    let item = ProductItem::from(product);

    set_json(
        state.cache.as_ref(),
        &cache_key,
        &item,
        Some(PRODUCT_DETAIL_TTL_SECONDS),
    )
    .await;

    Ok(Json(item))
}
