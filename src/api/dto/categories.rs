//! DTOs for the category select endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::entities::CategoryGroup;

/// Category options grouped by top-level category.
///
/// ```json
/// { "groups": [ { "label": "Kitchen", "options": [ { "value": 3, "label": "Mugs" } ] } ] }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySelectResponse {
    pub groups: Vec<CategoryGroup>,
}
