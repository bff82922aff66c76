//! CLI administration tool for the storefront.
//!
//! Manages categories, products and stock, and inspects orders directly in
//! the database without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Add a category (interactive prompts for missing values)
//! cargo run --bin admin -- category add --name "Kitchen"
//!
//! # Add a product under a category
//! cargo run --bin admin -- product add --name "Blue Mug" --price 1299 --stock 10 --category kitchen
//!
//! # Set stock
//! cargo run --bin admin -- product stock blue-mug 25
//!
//! # Inspect orders
//! cargo run --bin admin -- order list
//! cargo run --bin admin -- order show ORD-ABCDEFGHJK
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `REDIS_URL` (optional): cached catalogue entries are invalidated after changes

use storefront::application::services::OrderService;
use storefront::domain::entities::{NewCategory, NewProduct};
use storefront::domain::repositories::{Reader, Writer};
use storefront::infrastructure::cache::keys::{CATEGORIES_SELECT_KEY, product_key};
use storefront::infrastructure::cache::{CacheService, RedisCache};
use storefront::infrastructure::persistence::{
    PgCategoryRepository, PgOrderRepository, PgProductRepository,
};
use storefront::utils::slug::{is_valid_slug, slugify};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// Rows shown by the list commands.
const LIST_LIMIT: i64 = 50;

/// CLI tool for managing the storefront.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage categories
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// Manage products and stock
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },

    /// Inspect orders
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum CategoryAction {
    /// Create a category
    Add {
        #[arg(short, long)]
        name: Option<String>,

        /// Slug (derived from the name if omitted)
        #[arg(short, long)]
        slug: Option<String>,

        /// Parent category slug
        #[arg(short, long)]
        parent: Option<String>,

        #[arg(long, default_value_t = 0)]
        sort_order: i32,
    },

    /// List all categories
    List,
}

#[derive(Subcommand)]
enum ProductAction {
    /// Create a product
    Add {
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        slug: Option<String>,

        /// Price in cents
        #[arg(short, long)]
        price: Option<i64>,

        #[arg(long, default_value_t = 0)]
        stock: i32,

        /// Category slug
        #[arg(short, long)]
        category: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        /// Create the product hidden from the storefront
        #[arg(long)]
        hidden: bool,
    },

    /// List the most recent products
    List,

    /// Set the stock level of a product
    Stock { slug: String, stock: i32 },

    /// Delete a product that has never been ordered
    Delete {
        slug: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// List the most recent orders
    List,

    /// Show one order with its lines
    Show { number: String },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info and row counts
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Category { action } => handle_category_action(action, &pool).await?,
        Commands::Product { action } => handle_product_action(action, &pool).await?,
        Commands::Order { action } => handle_order_action(action, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Drops cached catalogue entries after a change, when Redis is configured.
async fn invalidate(keys: &[String]) {
    let Ok(redis_url) = std::env::var("REDIS_URL") else {
        return;
    };

    match RedisCache::connect(&redis_url, 1).await {
        Ok(cache) => {
            for key in keys {
                if let Err(e) = cache.invalidate(key).await {
                    println!("{} {}: {}", "Cache invalidation failed for".yellow(), key, e);
                }
            }
        }
        Err(e) => println!("{} {}", "Cache not reachable:".yellow(), e),
    }
}

fn prompt_if_missing(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Input::new().with_prompt(prompt).interact_text()?),
    }
}

fn resolve_slug(slug: Option<String>, name: &str) -> Result<String> {
    let slug = slug.unwrap_or_else(|| slugify(name));
    if !is_valid_slug(&slug) {
        anyhow::bail!("'{}' is not a valid slug", slug);
    }
    Ok(slug)
}

async fn handle_category_action(action: CategoryAction, pool: &PgPool) -> Result<()> {
    let repo = PgCategoryRepository::new(Arc::new(pool.clone()));

    match action {
        CategoryAction::Add {
            name,
            slug,
            parent,
            sort_order,
        } => {
            println!("{}", "Create category".bright_blue().bold());
            println!();

            let name = prompt_if_missing(name, "Category name")?;
            let slug = resolve_slug(slug, &name)?;

            let parent_id = match parent {
                Some(parent_slug) => Some(
                    repo.find_by_slug(&parent_slug)
                        .await?
                        .with_context(|| format!("Parent category '{}' not found", parent_slug))?
                        .id,
                ),
                None => None,
            };

            let category = repo
                .create(NewCategory {
                    parent_id,
                    name,
                    slug,
                    sort_order,
                })
                .await?;

            invalidate(&[CATEGORIES_SELECT_KEY.to_string()]).await;

            println!(
                "{} {} ({})",
                "Category created:".green().bold(),
                category.name.cyan(),
                category.slug.bright_black()
            );
        }
        CategoryAction::List => {
            println!("{}", "Categories".bright_blue().bold());
            println!();

            let categories = repo.all().await?;
            if categories.is_empty() {
                println!("{}", "  No categories found".yellow());
                return Ok(());
            }

            println!(
                "  {:<5} {:<7} {:<30} {:<30} {}",
                "ID".bright_white().bold(),
                "Parent".bright_white().bold(),
                "Name".bright_white().bold(),
                "Slug".bright_white().bold(),
                "Order".bright_white().bold()
            );
            println!("  {}", "-".repeat(80).bright_black());

            for category in &categories {
                let parent = category
                    .parent_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "-".to_string());

                println!(
                    "  {:<5} {:<7} {:<30} {:<30} {}",
                    category.id.to_string().bright_black(),
                    parent.bright_black(),
                    category.name.cyan(),
                    category.slug,
                    category.sort_order
                );
            }

            println!();
            println!(
                "  Total: {}",
                categories.len().to_string().bright_white().bold()
            );
        }
    }

    Ok(())
}

async fn handle_product_action(action: ProductAction, pool: &PgPool) -> Result<()> {
    let pool = Arc::new(pool.clone());
    let repo = PgProductRepository::new(pool.clone());

    match action {
        ProductAction::Add {
            name,
            slug,
            price,
            stock,
            category,
            description,
            hidden,
        } => {
            println!("{}", "Create product".bright_blue().bold());
            println!();

            let name = prompt_if_missing(name, "Product name")?;
            let slug = resolve_slug(slug, &name)?;
            let price_cents = match price {
                Some(p) => p,
                None => Input::new().with_prompt("Price (cents)").interact_text()?,
            };

            if price_cents < 0 {
                anyhow::bail!("Price must not be negative");
            }
            if stock < 0 {
                anyhow::bail!("Stock must not be negative");
            }

            let category_id = match category {
                Some(category_slug) => Some(
                    PgCategoryRepository::new(pool.clone())
                        .find_by_slug(&category_slug)
                        .await?
                        .with_context(|| format!("Category '{}' not found", category_slug))?
                        .id,
                ),
                None => None,
            };

            let product = repo
                .create(NewProduct {
                    category_id,
                    name,
                    slug,
                    description,
                    price_cents,
                    stock,
                    is_public: !hidden,
                })
                .await?;

            println!(
                "{} {} ({}, {} in stock)",
                "Product created:".green().bold(),
                product.name.cyan(),
                format_cents(product.price_cents),
                product.stock
            );
        }
        ProductAction::List => {
            println!("{}", "Products".bright_blue().bold());
            println!();

            let products = repo.list(0, LIST_LIMIT).await?;
            if products.is_empty() {
                println!("{}", "  No products found".yellow());
                return Ok(());
            }

            println!(
                "  {:<5} {:<30} {:<12} {:<7} {:<15} {}",
                "ID".bright_white().bold(),
                "Slug".bright_white().bold(),
                "Price".bright_white().bold(),
                "Stock".bright_white().bold(),
                "Category".bright_white().bold(),
                "Visibility".bright_white().bold()
            );
            println!("  {}", "-".repeat(85).bright_black());

            for product in &products {
                let visibility = if product.is_public {
                    "PUBLIC".green()
                } else {
                    "HIDDEN".red()
                };
                let stock = if product.in_stock() {
                    product.stock.to_string().normal()
                } else {
                    product.stock.to_string().red()
                };

                println!(
                    "  {:<5} {:<30} {:<12} {:<7} {:<15} {}",
                    product.id.to_string().bright_black(),
                    product.slug.cyan(),
                    format_cents(product.price_cents),
                    stock,
                    product.category_slug.as_deref().unwrap_or("-"),
                    visibility
                );
            }

            let total = repo.count().await?;
            println!();
            println!(
                "  Showing {} of {}",
                products.len().to_string().bright_white().bold(),
                total.to_string().bright_white().bold()
            );
        }
        ProductAction::Stock { slug, stock } => {
            if stock < 0 {
                anyhow::bail!("Stock must not be negative");
            }

            let product = repo
                .find_by_slug_any(&slug)
                .await?
                .with_context(|| format!("Product '{}' not found", slug))?;

            let updated = repo
                .set_stock(product.id, stock)
                .await?
                .with_context(|| format!("Product '{}' disappeared", slug))?;

            invalidate(&[product_key(&slug)]).await;

            println!(
                "{} {}: {} -> {}",
                "Stock updated".green().bold(),
                updated.slug.cyan(),
                product.stock,
                updated.stock.to_string().bright_white().bold()
            );
        }
        ProductAction::Delete { slug, yes } => {
            let product = repo
                .find_by_slug_any(&slug)
                .await?
                .with_context(|| format!("Product '{}' not found", slug))?;

            println!("  Product: {}", product.name.cyan());
            println!("  ID:      {}", product.id.to_string().bright_black());
            println!();

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt("Delete this product?")
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "Cancelled".red());
                    return Ok(());
                }
            }

            let deleted = repo
                .delete(product.id)
                .await
                .context("Failed to delete product (it may be referenced by orders)")?;

            if deleted {
                invalidate(&[product_key(&slug)]).await;
                println!("{}", "Product deleted".green().bold());
            } else {
                println!("{}", "Product was already deleted".yellow());
            }
        }
    }

    Ok(())
}

async fn handle_order_action(action: OrderAction, pool: &PgPool) -> Result<()> {
    let repo = PgOrderRepository::new(Arc::new(pool.clone()));

    match action {
        OrderAction::List => {
            println!("{}", "Orders".bright_blue().bold());
            println!();

            let orders = repo.list(0, LIST_LIMIT).await?;
            if orders.is_empty() {
                println!("{}", "  No orders found".yellow());
                return Ok(());
            }

            println!(
                "  {:<16} {:<10} {:<30} {:<7} {:<12} {}",
                "Number".bright_white().bold(),
                "Status".bright_white().bold(),
                "Customer".bright_white().bold(),
                "Units".bright_white().bold(),
                "Total".bright_white().bold(),
                "Placed".bright_white().bold()
            );
            println!("  {}", "-".repeat(95).bright_black());

            for order in &orders {
                println!(
                    "  {:<16} {:<10} {:<30} {:<7} {:<12} {}",
                    order.number.cyan(),
                    order.status.to_string(),
                    order.customer.email,
                    order.unit_count(),
                    format_cents(order.total_cents),
                    order
                        .created_at
                        .format("%Y-%m-%d %H:%M")
                        .to_string()
                        .bright_black()
                );
            }

            println!();
            println!("  Total: {}", repo.count().await?.to_string().bright_white().bold());
        }
        OrderAction::Show { number } => {
            let order = OrderService::new(Arc::new(repo))
                .find_order(number.trim())
                .await?;

            println!("{} {}", "Order".bright_blue().bold(), order.number.cyan().bold());
            println!();
            println!("  Status:   {}", order.status);
            println!(
                "  Placed:   {}",
                order.created_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
            println!(
                "  Customer: {} <{}>",
                order.customer.name, order.customer.email
            );
            if let Some(phone) = &order.customer.phone {
                println!("  Phone:    {}", phone);
            }
            println!(
                "  Ship to:  {}, {} {}, {}",
                order.shipping.line1,
                order.shipping.postal_code,
                order.shipping.city,
                order.shipping.country
            );
            if let Some(note) = &order.note {
                println!("  Note:     {}", note.italic());
            }
            println!();

            for item in &order.items {
                println!(
                    "  {:>4} x {:<30} {:>12} {:>12}",
                    item.quantity,
                    item.product_name,
                    format_cents(item.unit_price_cents),
                    format_cents(item.line_total_cents)
                );
            }
            println!("  {}", "-".repeat(63).bright_black());
            println!(
                "  {:>63}",
                format_cents(order.total_cents).bright_white().bold()
            );
        }
    }

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            println!("  PostgreSQL: {}", version.bright_white());

            for table in ["categories", "products", "orders", "order_items"] {
                let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
                    .fetch_one(pool)
                    .await?;
                println!(
                    "  {:<12} {}",
                    format!("{table}:"),
                    count.to_string().bright_green().bold()
                );
            }
            println!();
        }
    }

    Ok(())
}

/// Formats an amount in cents as `12.99`.
fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}
