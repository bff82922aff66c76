//! Cache key layout.

/// Grouped category options for the select control.
pub const CATEGORIES_SELECT_KEY: &str = "catalog:categories:select";

/// Lifetime of product detail entries.
///
/// Kept short because a detail read racing an order can store pre-order
/// stock after the order invalidated the key.
pub const PRODUCT_DETAIL_TTL_SECONDS: u64 = 30;

/// Public product detail by slug.
pub fn product_key(slug: &str) -> String {
    format!("catalog:product:{slug}")
}
