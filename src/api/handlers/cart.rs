//! Handler for the cart stock check.

use axum::{Json, extract::State};

use crate::api::dto::cart::{CartValidateRequest, CartValidateResponse};
use crate::api::extract::ValidatedJson;
use crate::error::AppError;
use crate::state::AppState;

/// Checks a cart against current stock without reserving anything.
///
/// # Endpoint
///
/// `POST /api/cart/validate`
///
/// # Request Body
///
/// ```json
/// { "items": [ { "product_id": 7, "quantity": 2 }, { "product_id": 9, "quantity": 1 } ] }
/// ```
///
/// # Response
///
/// Always **200 OK** for a well-formed cart; `valid` tells whether it can be ordered.
///
/// ```json
/// {
///   "valid": false,
///   "lines": [
///     { "product_id": 7, "requested": 2, "available": 5, "status": "ok" },
///     { "product_id": 9, "requested": 1, "available": 0, "status": "unavailable" }
///   ]
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the body is malformed or fails validation.
pub async fn cart_validate_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CartValidateRequest>,
) -> Result<Json<CartValidateResponse>, AppError> {
    let report = state
        .catalog_service
        .validate_cart_stock(&payload.lines())
        .await?;

    Ok(Json(report.into()))
}
