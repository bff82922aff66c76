//! Handler for order placement.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::order::{CreateOrderRequest, OrderResponse};
use crate::api::extract::ValidatedJson;
use crate::error::AppError;
use crate::infrastructure::cache::keys::product_key;
use crate::state::AppState;

/// Places an order.
///
/// # Endpoint
///
/// `POST /api/orders`
///
/// # Request Body
///
/// ```json
/// {
///   "customer": { "name": "Ada Lovelace", "email": "ada@example.com", "phone": "+44 20 7946 0000" },
///   "shipping": { "line1": "12 Analytical Row", "city": "London", "postal_code": "N1 9GU", "country": "GB" },
///   "note": "Leave at the door",
///   "items": [ { "product_id": 7, "quantity": 2 } ]
/// }
/// ```
///
/// # Response
///
/// **201 Created** with the order, including server-side prices and its
/// `ORD-` number.
///
/// # Cache
///
/// Detail entries of the ordered products are invalidated so that stock
/// shown to clients is current.
///
/// # Errors
///
/// - 400 Bad Request if the body is malformed or fails validation
/// - 409 Conflict if stock is insufficient; `error.details` holds the stock report
pub async fn create_order_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), AppError> {
    let order = state
        .order_service
        .place_order(payload.into_new_order())
        .await?;

    for item in &order.items {
        let cache_key = product_key(&item.product_slug);
        if let Err(e) = state.cache.invalidate(&cache_key).await {
            tracing::warn!(error = ?e, cache_key, "Failed to invalidate cache after order");
        }
    }

    Ok((StatusCode::CREATED, Json(order.into())))
}
