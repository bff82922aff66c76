//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures. Behaviour that spans several entities
//! lives in [`crate::domain::catalog`].
//!
//! # Entity Types
//!
//! - [`Category`] - A node of the self-referencing category tree
//! - [`Product`] - A sellable catalogue item with price and stock
//! - [`Order`] - A placed order with its priced [`OrderItem`]s
//!
//! # Design Pattern
//!
//! Separate structs are used for creation:
//! - `NewCategory`, `NewProduct`, `NewOrder` - For creating new records
//! - `CartLine` - A requested product quantity, shared by cart checks and orders

pub mod category;
pub mod order;
pub mod product;

pub use category::{Category, CategoryGroup, NewCategory, SelectOption};
pub use order::{
    CustomerDetails, NewOrder, NewOrderItem, Order, OrderItem, OrderOutcome, OrderStatus,
    ShippingAddress,
};
pub use product::{
    CartLine, NewProduct, Product, ProductFilter, ProductSort, StockLevel, StockLine, StockReport,
    StockStatus,
};
