//! Category entity and the select-widget projection of the category tree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A node of the category tree.
///
/// `parent_id` points at another category; top-level categories have none.
#[derive(Debug, Clone)]
pub struct Category {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub name: String,
    pub slug: String,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Creates a new Category instance.
    pub fn new(
        id: i64,
        parent_id: Option<i64>,
        name: String,
        slug: String,
        sort_order: i32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            parent_id,
            name,
            slug,
            sort_order,
            created_at,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Input data for creating a new category.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub parent_id: Option<i64>,
    pub name: String,
    pub slug: String,
    pub sort_order: i32,
}

/// One selectable entry of a category choice control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: i64,
    pub label: String,
}

/// Options grouped under a top-level category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub label: String,
    pub options: Vec<SelectOption>,
}
