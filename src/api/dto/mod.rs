//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. Response DTOs that are cached also derive
//! `Deserialize` so cached JSON can be decoded back.

pub mod cart;
pub mod categories;
pub mod health;
pub mod order;
pub mod pagination;
pub mod products;
