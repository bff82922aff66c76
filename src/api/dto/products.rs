//! DTOs for product listing and detail endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_with::{DisplayFromStr, serde_as};

use super::pagination::{PaginationMeta, PaginationParams};
use crate::domain::entities::{Product, ProductFilter, ProductSort};
use crate::domain::repositories::PageRequest;
use crate::error::AppError;
use crate::utils::slug::is_valid_slug;

/// Longest accepted search term.
const MAX_SEARCH_LENGTH: usize = 200;

/// Query parameters of `GET /api/products`.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,

    #[serde(default)]
    pub search: Option<String>,

    /// Category slug; includes products of descendant categories.
    #[serde(default)]
    pub category: Option<String>,

    /// Inclusive lower price bound in cents.
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub min_price: Option<i64>,

    /// Inclusive upper price bound in cents.
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub max_price: Option<i64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub in_stock: Option<bool>,

    #[serde(default)]
    pub sort: Option<ProductSort>,
}

impl ProductListQuery {
    /// Validates the query and builds the repository filter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for bad pagination, negative prices,
    /// an over-long search term or a malformed category slug.
    pub fn to_filter(&self) -> Result<(ProductFilter, PageRequest), AppError> {
        let page = self
            .pagination
            .to_page_request()
            .map_err(|e| AppError::bad_request(e, json!({})))?;

        for (name, value) in [("min_price", self.min_price), ("max_price", self.max_price)] {
            if let Some(v) = value
                && v < 0
            {
                return Err(AppError::bad_request(
                    format!("{name} must not be negative"),
                    json!({ "field": name, "value": v }),
                ));
            }
        }

        if let Some(search) = &self.search
            && search.chars().count() > MAX_SEARCH_LENGTH
        {
            return Err(AppError::bad_request(
                format!("search must be at most {MAX_SEARCH_LENGTH} characters"),
                json!({}),
            ));
        }

        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        if let Some(slug) = category
            && !is_valid_slug(slug)
        {
            return Err(AppError::bad_request(
                "Invalid category slug",
                json!({ "category": slug }),
            ));
        }

        let filter = ProductFilter::new(page.offset(), page.limit())
            .with_search(self.search.clone())
            .with_category(category.map(str::to_string))
            .with_price_range(self.min_price, self.max_price)
            .only_in_stock(self.in_stock.unwrap_or(false))
            .sorted_by(self.sort.unwrap_or_default());

        Ok((filter, page))
    }
}

/// Public representation of a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductItem {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub category_slug: Option<String>,
    pub stock: i32,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductItem {
    fn from(p: Product) -> Self {
        let in_stock = p.in_stock();
        Self {
            id: p.id,
            name: p.name,
            slug: p.slug,
            description: p.description,
            price_cents: p.price_cents,
            category_slug: p.category_slug,
            stock: p.stock,
            in_stock,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// One page of public products.
#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub items: Vec<ProductItem>,
    pub pagination: PaginationMeta,
}
