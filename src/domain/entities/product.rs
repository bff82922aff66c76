//! Product entity, listing filter and stock check types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A sellable catalogue item.
///
/// Prices are integer minor units (cents). `category_slug` is filled by joins
/// and is `None` for uncategorised products.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: i64,
    pub category_id: Option<i64>,
    pub category_slug: Option<String>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub stock: i32,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Input data for creating a new product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub category_id: Option<i64>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub stock: i32,
    pub is_public: bool,
}

/// Sort orders accepted by the public listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    Name,
}

/// Filter criteria for the public product listing.
#[derive(Debug, Clone)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub in_stock: bool,
    pub sort: ProductSort,
    pub offset: i64,
    pub limit: i64,
}

impl ProductFilter {
    /// Creates an unfiltered listing with pagination parameters.
    pub fn new(offset: i64, limit: i64) -> Self {
        Self {
            search: None,
            category: None,
            min_price: None,
            max_price: None,
            in_stock: false,
            sort: ProductSort::default(),
            offset,
            limit,
        }
    }

    /// Adds a case-insensitive name/description search. Blank terms are ignored.
    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self
    }

    /// Restricts the listing to a category slug and its descendants.
    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }

    /// Adds an inclusive price range in cents.
    pub fn with_price_range(mut self, min_price: Option<i64>, max_price: Option<i64>) -> Self {
        self.min_price = min_price;
        self.max_price = max_price;
        self
    }

    pub fn only_in_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = in_stock;
        self
    }

    pub fn sorted_by(mut self, sort: ProductSort) -> Self {
        self.sort = sort;
        self
    }
}

/// A requested quantity of one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: i64,
    pub quantity: i32,
}

impl CartLine {
    pub fn new(product_id: i64, quantity: i32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// Current sellable state of a product, as read inside a stock check.
#[derive(Debug, Clone)]
pub struct StockLevel {
    pub product_id: i64,
    pub name: String,
    pub slug: String,
    pub price_cents: i64,
    pub available: i32,
    pub is_public: bool,
}

/// Outcome of the stock check for a single product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Ok,
    InsufficientStock,
    Unavailable,
}

/// Stock check result for one product of a cart.
///
/// `requested` is the total over every cart line naming the product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockLine {
    pub product_id: i64,
    pub requested: i64,
    pub available: i32,
    pub status: StockStatus,
}

/// Per-product stock check result for a whole cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockReport {
    pub valid: bool,
    pub lines: Vec<StockLine>,
}

impl StockReport {
    /// Lines that prevent the cart from being ordered.
    pub fn problems(&self) -> impl Iterator<Item = &StockLine> {
        self.lines.iter().filter(|l| l.status != StockStatus::Ok)
    }
}
