//! PostgreSQL implementation of the catalogue repository.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::sync::Arc;

use super::pg_category_repository::load_all;
use super::rows::{PRODUCT_COLUMNS, ProductRow, STOCK_COLUMNS, StockRow};
use crate::domain::catalog::{check_stock, group_for_select};
use crate::domain::entities::{
    CartLine, CategoryGroup, NewProduct, Product, ProductFilter, ProductSort, StockLevel,
    StockReport,
};
use crate::domain::repositories::{Paginated, ProductRepository, Reader, Writer};
use crate::error::AppError;

/// PostgreSQL repository for products.
///
/// Public operations only ever see `is_public` rows; the [`Reader`] and
/// [`Writer`] capabilities and the inherent helpers see every row and are used
/// by the admin tool.
pub struct PgProductRepository {
    pool: Arc<PgPool>,
}

impl PgProductRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Finds a product by slug whether or not it is public.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn find_by_slug_any(&self, slug: &str) -> Result<Option<Product>, AppError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p \
             LEFT JOIN categories c ON c.id = p.category_id \
             WHERE p.slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Product::from))
    }

    /// Overwrites the stock of a product.
    ///
    /// Returns `Ok(None)` if the product does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors, including a negative
    /// `stock` rejected by the table constraint.
    pub async fn set_stock(&self, id: i64, stock: i32) -> Result<Option<Product>, AppError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "WITH updated AS ( \
                 UPDATE products SET stock = $2, updated_at = NOW() \
                 WHERE id = $1 RETURNING * \
             ) \
             SELECT {PRODUCT_COLUMNS} FROM updated p \
             LEFT JOIN categories c ON c.id = p.category_id"
        ))
        .bind(id)
        .bind(stock)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Product::from))
    }
}

/// Escapes `LIKE` wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Appends the public-listing predicates of `filter` after a `WHERE p.is_public`.
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(search));
        qb.push(" AND (p.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(category) = &filter.category {
        qb.push(
            " AND p.category_id IN ( \
                 WITH RECURSIVE tree AS ( \
                     SELECT id FROM categories WHERE slug = ",
        )
        .push_bind(category.clone())
        .push(
            " UNION \
                     SELECT child.id FROM categories child \
                     JOIN tree ON child.parent_id = tree.id \
                 ) \
                 SELECT id FROM tree)",
        );
    }

    if let Some(min) = filter.min_price {
        qb.push(" AND p.price_cents >= ").push_bind(min);
    }

    if let Some(max) = filter.max_price {
        qb.push(" AND p.price_cents <= ").push_bind(max);
    }

    if filter.in_stock {
        qb.push(" AND p.stock > 0");
    }
}

fn order_clause(sort: ProductSort) -> &'static str {
    match sort {
        ProductSort::Newest => " ORDER BY p.created_at DESC, p.id DESC",
        ProductSort::PriceAsc => " ORDER BY p.price_cents ASC, p.id ASC",
        ProductSort::PriceDesc => " ORDER BY p.price_cents DESC, p.id DESC",
        ProductSort::Name => " ORDER BY p.name ASC, p.id ASC",
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn categories_for_select(&self) -> Result<Vec<CategoryGroup>, AppError> {
        let categories = load_all(self.pool.as_ref()).await?;
        Ok(group_for_select(&categories))
    }

    async fn public_products(&self, filter: ProductFilter) -> Result<Paginated<Product>, AppError> {
        let mut count_query =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products p WHERE p.is_public");
        push_filters(&mut count_query, &filter);

        let total: i64 = count_query
            .build_query_scalar::<i64>()
            .fetch_one(self.pool.as_ref())
            .await?;

        if total == 0 {
            return Ok(Paginated::empty());
        }

        let mut page_query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p \
             LEFT JOIN categories c ON c.id = p.category_id \
             WHERE p.is_public"
        ));
        push_filters(&mut page_query, &filter);
        page_query
            .push(order_clause(filter.sort))
            .push(" LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset);

        let rows: Vec<ProductRow> = page_query
            .build_query_as::<ProductRow>()
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(Paginated::new(
            rows.into_iter().map(Product::from).collect(),
            total,
        ))
    }

    async fn public_product_by_slug(&self, slug: &str) -> Result<Option<Product>, AppError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p \
             LEFT JOIN categories c ON c.id = p.category_id \
             WHERE p.slug = $1 AND p.is_public"
        ))
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Product::from))
    }

    async fn validate_cart_stock(&self, lines: &[CartLine]) -> Result<StockReport, AppError> {
        if lines.is_empty() {
            return Ok(check_stock(lines, &[]));
        }

        let mut ids: Vec<i64> = lines.iter().map(|l| l.product_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let rows = sqlx::query_as::<_, StockRow>(&format!(
            "SELECT {STOCK_COLUMNS} FROM products WHERE id = ANY($1)"
        ))
        .bind(&ids[..])
        .fetch_all(self.pool.as_ref())
        .await?;

        let levels: Vec<StockLevel> = rows.into_iter().map(StockLevel::from).collect();

        Ok(check_stock(lines, &levels))
    }

    async fn count_public(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_public")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}

#[async_trait]
impl Reader<Product> for PgProductRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, AppError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p \
             LEFT JOIN categories c ON c.id = p.category_id \
             WHERE p.id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Product::from))
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Product>, AppError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p \
             LEFT JOIN categories c ON c.id = p.category_id \
             ORDER BY p.created_at DESC, p.id DESC \
             LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}

#[async_trait]
impl Writer<NewProduct, Product> for PgProductRepository {
    async fn create(&self, new: NewProduct) -> Result<Product, AppError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "WITH inserted AS ( \
                 INSERT INTO products \
                     (category_id, name, slug, description, price_cents, stock, is_public) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7) \
                 RETURNING * \
             ) \
             SELECT {PRODUCT_COLUMNS} FROM inserted p \
             LEFT JOIN categories c ON c.id = p.category_id"
        ))
        .bind(new.category_id)
        .bind(new.name)
        .bind(new.slug)
        .bind(new.description)
        .bind(new.price_cents)
        .bind(new.stock)
        .bind(new.is_public)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("mug"), "mug");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b\\c"), "a\\_b\\\\c");
    }

    #[test]
    fn test_filter_sql_shape() {
        let filter = ProductFilter::new(0, 20)
            .with_search(Some("mug".to_string()))
            .with_category(Some("kitchen".to_string()))
            .with_price_range(Some(100), Some(5000))
            .only_in_stock(true);

        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1 FROM products p WHERE p.is_public");
        push_filters(&mut qb, &filter);
        let sql = qb.sql();

        assert!(sql.contains("p.name ILIKE $1 OR p.description ILIKE $2"));
        assert!(sql.contains("WITH RECURSIVE tree"));
        assert!(sql.contains("p.price_cents >= $4"));
        assert!(sql.contains("p.price_cents <= $5"));
        assert!(sql.contains("p.stock > 0"));
    }

    #[test]
    fn test_empty_filter_adds_nothing() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1 FROM products p WHERE p.is_public");
        push_filters(&mut qb, &ProductFilter::new(0, 20));
        assert_eq!(qb.sql(), "SELECT 1 FROM products p WHERE p.is_public");
    }

    #[test]
    fn test_order_clause() {
        assert!(order_clause(ProductSort::Newest).contains("created_at DESC"));
        assert!(order_clause(ProductSort::PriceAsc).contains("price_cents ASC"));
        assert!(order_clause(ProductSort::PriceDesc).contains("price_cents DESC"));
        assert!(order_clause(ProductSort::Name).contains("p.name ASC"));
    }
}
