//! PostgreSQL repository implementations.
//!
//! Concrete implementations of the domain repository traits using SQLx
//! runtime queries decoded through `FromRow` row types.
//!
//! # Repositories
//!
//! - [`PgProductRepository`] - Public catalogue, stock checks and product admin
//! - [`PgOrderRepository`] - Transactional order placement and lookup
//! - [`PgCategoryRepository`] - Category tree maintenance

pub mod pg_category_repository;
pub mod pg_order_repository;
pub mod pg_product_repository;
mod rows;

pub use pg_category_repository::PgCategoryRepository;
pub use pg_order_repository::PgOrderRepository;
pub use pg_product_repository::PgProductRepository;
