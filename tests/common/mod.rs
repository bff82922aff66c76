#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::routing::get;
use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::PgPool;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use storefront::api;
use storefront::api::handlers::health_handler;
use storefront::application::services::{CatalogService, OrderService};
use storefront::domain::catalog::{check_stock, group_for_select, order_total, price_lines};
use storefront::domain::entities::{
    CartLine, Category, CategoryGroup, NewOrder, Order, OrderItem, OrderOutcome, OrderStatus,
    Product, ProductFilter, ProductSort, StockLevel, StockReport,
};
use storefront::domain::repositories::{OrderRepository, Paginated, ProductRepository};
use storefront::error::AppError;
use storefront::infrastructure::cache::{CacheResult, CacheService, NullCache};
use storefront::state::AppState;
use storefront::utils::order_number::generate_order_number;

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
}

pub fn category(id: i64, parent_id: Option<i64>, name: &str, sort_order: i32) -> Category {
    Category::new(
        id,
        parent_id,
        name.to_string(),
        name.to_lowercase(),
        sort_order,
        base_time(),
    )
}

/// A public product; later ids are newer.
pub fn product(id: i64, category_id: Option<i64>, name: &str, price_cents: i64, stock: i32) -> Product {
    let created_at = base_time() + Duration::minutes(id);
    Product {
        id,
        category_id,
        category_slug: None,
        name: name.to_string(),
        slug: name.to_lowercase().replace(' ', "-"),
        description: Some(format!("{name} description")),
        price_cents,
        stock,
        is_public: true,
        created_at,
        updated_at: created_at,
    }
}

/// Categories:
///
/// ```text
/// Kitchen (1)
///   Mugs (2)
///     Travel (6)
///   Plates (3)
/// Garden (4)
/// Books (5)
/// ```
pub fn sample_categories() -> Vec<Category> {
    vec![
        category(1, None, "Kitchen", 0),
        category(2, Some(1), "Mugs", 0),
        category(3, Some(1), "Plates", 1),
        category(4, None, "Garden", 1),
        category(5, None, "Books", 2),
        category(6, Some(2), "Travel", 0),
    ]
}

/// Public products newest first: Garden Hose, Travel Mug, Dinner Plate, Red Mug, Blue Mug.
/// "Secret Mug" is hidden.
pub fn sample_products() -> Vec<Product> {
    let mut secret = product(5, Some(2), "Secret Mug", 999, 10);
    secret.is_public = false;

    vec![
        product(1, Some(2), "Blue Mug", 1299, 5),
        product(2, Some(2), "Red Mug", 1099, 0),
        product(3, Some(3), "Dinner Plate", 2500, 12),
        product(4, Some(4), "Garden Hose", 3999, 3),
        secret,
        product(6, Some(6), "Travel Mug", 1899, 2),
    ]
}

/// In-memory catalogue and order store applying the same domain rules as the
/// PostgreSQL repositories.
pub struct InMemoryStore {
    categories: Vec<Category>,
    products: Mutex<Vec<Product>>,
    orders: Mutex<Vec<Order>>,
    broken: bool,
}

impl InMemoryStore {
    pub fn new(categories: Vec<Category>, products: Vec<Product>) -> Self {
        let slugs: HashMap<i64, String> = categories
            .iter()
            .map(|c| (c.id, c.slug.clone()))
            .collect();

        let products = products
            .into_iter()
            .map(|mut p| {
                p.category_slug = p.category_id.and_then(|id| slugs.get(&id).cloned());
                p
            })
            .collect();

        Self {
            categories,
            products: Mutex::new(products),
            orders: Mutex::new(Vec::new()),
            broken: false,
        }
    }

    pub fn seeded() -> Self {
        Self::new(sample_categories(), sample_products())
    }

    /// Store whose every call fails like an unreachable database.
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::new(Vec::new(), Vec::new())
        }
    }

    pub fn stock_of(&self, product_id: i64) -> i32 {
        self.products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == product_id)
            .map(|p| p.stock)
            .unwrap_or_default()
    }

    pub fn order_count(&self) -> usize {
        self.orders.lock().unwrap().len()
    }

    fn check(&self) -> Result<(), AppError> {
        if self.broken {
            Err(AppError::internal("Database error", serde_json::json!({})))
        } else {
            Ok(())
        }
    }

    fn subtree(&self, slug: &str) -> HashSet<i64> {
        let mut ids: HashSet<i64> = self
            .categories
            .iter()
            .filter(|c| c.slug == slug)
            .map(|c| c.id)
            .collect();

        loop {
            let before = ids.len();
            for c in &self.categories {
                if let Some(parent) = c.parent_id
                    && ids.contains(&parent)
                {
                    ids.insert(c.id);
                }
            }
            if ids.len() == before {
                return ids;
            }
        }
    }

    fn levels(&self, lines: &[CartLine]) -> Vec<StockLevel> {
        let wanted: HashSet<i64> = lines.iter().map(|l| l.product_id).collect();
        self.products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| wanted.contains(&p.id))
            .map(|p| StockLevel {
                product_id: p.id,
                name: p.name.clone(),
                slug: p.slug.clone(),
                price_cents: p.price_cents,
                available: p.stock,
                is_public: p.is_public,
            })
            .collect()
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn categories_for_select(&self) -> Result<Vec<CategoryGroup>, AppError> {
        self.check()?;
        Ok(group_for_select(&self.categories))
    }

    async fn public_products(&self, filter: ProductFilter) -> Result<Paginated<Product>, AppError> {
        self.check()?;

        let subtree = filter.category.as_deref().map(|slug| self.subtree(slug));
        let search = filter.search.as_deref().map(str::to_lowercase);

        let mut matching: Vec<Product> = self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.is_public)
            .filter(|p| {
                search.as_deref().is_none_or(|s| {
                    p.name.to_lowercase().contains(s)
                        || p.description
                            .as_deref()
                            .is_some_and(|d| d.to_lowercase().contains(s))
                })
            })
            .filter(|p| {
                subtree
                    .as_ref()
                    .is_none_or(|ids| p.category_id.is_some_and(|id| ids.contains(&id)))
            })
            .filter(|p| filter.min_price.is_none_or(|min| p.price_cents >= min))
            .filter(|p| filter.max_price.is_none_or(|max| p.price_cents <= max))
            .filter(|p| !filter.in_stock || p.in_stock())
            .cloned()
            .collect();

        match filter.sort {
            ProductSort::Newest => {
                matching.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)))
            }
            ProductSort::PriceAsc => matching.sort_by_key(|p| (p.price_cents, p.id)),
            ProductSort::PriceDesc => {
                matching.sort_by(|a, b| (b.price_cents, b.id).cmp(&(a.price_cents, a.id)))
            }
            ProductSort::Name => matching.sort_by(|a, b| (&a.name, a.id).cmp(&(&b.name, b.id))),
        }

        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .collect();

        Ok(Paginated::new(items, total))
    }

    async fn public_product_by_slug(&self, slug: &str) -> Result<Option<Product>, AppError> {
        self.check()?;
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.is_public && p.slug == slug)
            .cloned())
    }

    async fn validate_cart_stock(&self, lines: &[CartLine]) -> Result<StockReport, AppError> {
        self.check()?;
        Ok(check_stock(lines, &self.levels(lines)))
    }

    async fn count_public(&self) -> Result<i64, AppError> {
        self.check()?;
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.is_public)
            .count() as i64)
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn create_order(&self, new_order: NewOrder) -> Result<OrderOutcome, AppError> {
        self.check()?;

        let levels = self.levels(&new_order.lines);
        let report = check_stock(&new_order.lines, &levels);
        if !report.valid {
            return Ok(OrderOutcome::Rejected(report));
        }

        let priced = price_lines(&new_order.lines, &levels)?;
        let total_cents = order_total(&priced)?;

        let mut products = self.products.lock().unwrap();
        for item in &priced {
            if let Some(p) = products.iter_mut().find(|p| p.id == item.product_id) {
                p.stock -= item.quantity;
            }
        }
        drop(products);

        let mut orders = self.orders.lock().unwrap();
        let order = Order {
            id: orders.len() as i64 + 1,
            number: generate_order_number(),
            status: OrderStatus::Pending,
            customer: new_order.customer,
            shipping: new_order.shipping,
            note: new_order.note,
            total_cents,
            items: priced
                .into_iter()
                .enumerate()
                .map(|(i, item)| OrderItem {
                    id: i as i64 + 1,
                    product_id: item.product_id,
                    product_name: item.product_name,
                    product_slug: item.product_slug,
                    unit_price_cents: item.unit_price_cents,
                    quantity: item.quantity,
                    line_total_cents: item.line_total_cents,
                })
                .collect(),
            created_at: Utc::now(),
        };
        orders.push(order.clone());

        Ok(OrderOutcome::Placed(order))
    }

    async fn find_by_number(&self, number: &str) -> Result<Option<Order>, AppError> {
        self.check()?;
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.number == number)
            .cloned())
    }
}

/// Cache keeping entries in a map; records invalidations.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
    ttls: Mutex<HashMap<String, Option<u64>>>,
    invalidated: Mutex<Vec<String>>,
}

impl MemoryCache {
    pub fn put(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    /// TTL requested by the last write of `key`; `None` means the default.
    pub fn ttl_of(&self, key: &str) -> Option<u64> {
        self.ttls.lock().unwrap().get(key).copied().flatten()
    }

    pub fn invalidated(&self) -> Vec<String> {
        self.invalidated.lock().unwrap().clone()
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> CacheResult<()> {
        self.put(key, value);
        self.ttls
            .lock()
            .unwrap()
            .insert(key.to_string(), ttl_seconds);
        Ok(())
    }

    async fn invalidate(&self, key: &str) -> CacheResult<()> {
        self.entries.lock().unwrap().remove(key);
        self.invalidated.lock().unwrap().push(key.to_string());
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

pub fn create_state(store: Arc<InMemoryStore>, cache: Arc<dyn CacheService>) -> AppState {
    AppState::new(
        Arc::new(CatalogService::new(store.clone())),
        Arc::new(OrderService::new(store)),
        cache,
    )
}

pub fn create_test_state() -> (AppState, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::seeded());
    let state = create_state(store.clone(), Arc::new(NullCache::new()));
    (state, store)
}

/// Application routes without the per-IP rate limiter, which needs a real
/// socket peer address.
pub fn test_router(state: AppState) -> Router {
    let api_router = api::routes::catalog_routes().merge(api::routes::order_routes());

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state)
}

pub async fn insert_category(pool: &PgPool, parent_id: Option<i64>, name: &str, sort_order: i32) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO categories (parent_id, name, slug, sort_order) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(parent_id)
    .bind(name)
    .bind(name.to_lowercase().replace(' ', "-"))
    .bind(sort_order)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn insert_product(
    pool: &PgPool,
    category_id: Option<i64>,
    name: &str,
    price_cents: i64,
    stock: i32,
    is_public: bool,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO products (category_id, name, slug, description, price_cents, stock, is_public) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
    )
    .bind(category_id)
    .bind(name)
    .bind(name.to_lowercase().replace(' ', "-"))
    .bind(format!("{name} description"))
    .bind(price_cents)
    .bind(stock)
    .bind(is_public)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn stock_in_db(pool: &PgPool, product_id: i64) -> i32 {
    sqlx::query_scalar("SELECT stock FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_one(pool)
        .await
        .unwrap()
}
