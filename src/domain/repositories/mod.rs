//! Repository trait definitions for the domain layer.
//!
//! This module defines the repository interfaces (traits) that abstract data access
//! operations following the Repository pattern. These traits are implemented by
//! concrete repositories in the infrastructure layer.
//!
//! # Architecture
//!
//! - [`Reader`] and [`Writer`] are the generic capabilities every table offers
//! - Domain traits describe the storefront operations on top of them
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`ProductRepository`] - Public catalogue and stock checks
//! - [`OrderRepository`] - Order placement and lookup
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod base;
pub mod order_repository;
pub mod product_repository;

pub use base::{DEFAULT_PER_PAGE, MAX_PER_PAGE, PageRequest, Paginated, Reader, Writer};
pub use order_repository::OrderRepository;
pub use product_repository::ProductRepository;

#[cfg(test)]
pub use order_repository::MockOrderRepository;
#[cfg(test)]
pub use product_repository::MockProductRepository;
