//! Handler for the category select endpoint.

use axum::{Json, extract::State};

use crate::api::dto::categories::CategorySelectResponse;
use crate::error::AppError;
use crate::infrastructure::cache::{get_json, keys::CATEGORIES_SELECT_KEY, set_json};
use crate::state::AppState;

/// Returns every category grouped by its top-level ancestor.
///
/// # Endpoint
///
/// `GET /api/categories/select`
///
/// # Response
///
/// ```json
/// {
///   "groups": [
///     { "label": "Apparel", "options": [
///         { "value": 5, "label": "Shirts" },
///         { "value": 6, "label": "Shirts / Long sleeve" }
///     ] },
///     { "label": "Gift cards", "options": [ { "value": 9, "label": "Gift cards" } ] }
///   ]
/// }
/// ```
///
/// # Cache
///
/// Served from the cache when present; entries expire after the configured TTL.
pub async fn categories_select_handler(
    State(state): State<AppState>,
) -> Result<Json<CategorySelectResponse>, AppError> {
    if let Some(cached) = get_json(state.cache.as_ref(), CATEGORIES_SELECT_KEY).await {
        return Ok(Json(cached));
    }

    let groups = state.catalog_service.categories_for_select().await?;
    let response = CategorySelectResponse { groups };

    set_json(state.cache.as_ref(), CATEGORIES_SELECT_KEY, &response, None).await;

    Ok(Json(response))
}
