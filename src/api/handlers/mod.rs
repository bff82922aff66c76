//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod cart;
pub mod categories;
pub mod health;
pub mod orders;
pub mod products;

pub use cart::cart_validate_handler;
pub use categories::categories_select_handler;
pub use health::health_handler;
pub use orders::create_order_handler;
pub use products::{product_detail_handler, product_list_handler};
