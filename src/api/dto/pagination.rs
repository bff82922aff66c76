//! Pagination query parameters and response metadata.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::domain::repositories::{DEFAULT_PER_PAGE, MAX_PER_PAGE, PageRequest};

/// Pagination query parameters.
///
/// Uses `serde_with` to parse page numbers from query strings as integers,
/// which keeps them working when flattened into a larger query struct.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<i64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub per_page: Option<i64>,
}

impl PaginationParams {
    /// Validates the parameters into a [`PageRequest`].
    ///
    /// # Defaults
    ///
    /// - `page`: 1
    /// - `per_page`: 20
    ///
    /// # Validation
    ///
    /// - Page must be > 0
    /// - Page size must be between 1 and 100
    pub fn to_page_request(&self) -> Result<PageRequest, String> {
        let page = self.page.unwrap_or(1);
        let per_page = self.per_page.unwrap_or(DEFAULT_PER_PAGE);

        if page < 1 {
            return Err("Page must be greater than 0".to_string());
        }

        if !(1..=MAX_PER_PAGE).contains(&per_page) {
            return Err(format!("per_page must be between 1 and {MAX_PER_PAGE}"));
        }

        Ok(PageRequest::new(page, per_page))
    }
}

/// Pagination block of listing responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: i64,
    pub per_page: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(page: PageRequest, total_items: i64) -> Self {
        Self {
            page: page.page,
            per_page: page.per_page,
            total_items,
            total_pages: page.total_pages(total_items),
        }
    }
}
