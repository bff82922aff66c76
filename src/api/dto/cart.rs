//! DTOs for the cart stock check endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{CartLine, StockLine, StockReport};

/// One requested product and quantity.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CartItemRequest {
    #[validate(range(min = 1, message = "product_id must be positive"))]
    pub product_id: i64,

    #[validate(range(min = 1, max = 1000, message = "quantity must be between 1 and 1000"))]
    pub quantity: i32,
}

impl From<&CartItemRequest> for CartLine {
    fn from(item: &CartItemRequest) -> Self {
        CartLine::new(item.product_id, item.quantity)
    }
}

/// Body of `POST /api/cart/validate`.
///
/// ```json
/// { "items": [ { "product_id": 7, "quantity": 2 } ] }
/// ```
#[derive(Debug, Deserialize, Validate)]
pub struct CartValidateRequest {
    #[validate(length(min = 1, max = 100, message = "items must contain 1 to 100 lines"))]
    #[validate(nested)]
    pub items: Vec<CartItemRequest>,
}

impl CartValidateRequest {
    pub fn lines(&self) -> Vec<CartLine> {
        self.items.iter().map(CartLine::from).collect()
    }
}

/// Stock check result returned to the client.
#[derive(Debug, Serialize)]
pub struct CartValidateResponse {
    pub valid: bool,
    pub lines: Vec<StockLine>,
}

impl From<StockReport> for CartValidateResponse {
    fn from(report: StockReport) -> Self {
        Self {
            valid: report.valid,
            lines: report.lines,
        }
    }
}
