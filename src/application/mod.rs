//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::catalog_service::CatalogService`] - Category options, product listing and cart checks
//! - [`services::order_service::OrderService`] - Order placement and lookup

pub mod services;
