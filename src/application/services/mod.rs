//! Business logic services for the application layer.

pub mod catalog_service;
pub mod order_service;

pub use catalog_service::CatalogService;
pub use order_service::OrderService;
