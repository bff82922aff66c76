//! Domain layer containing business entities and logic.
//!
//! This module implements the core domain logic following Clean Architecture principles.
//! It defines entities, repository interfaces, and the pure catalogue rules,
//! independent of infrastructure concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`catalog`] - Category grouping, stock checking and order pricing
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by infrastructure layer
//! - Rules that must agree between the stock check and order placement live in
//!   [`catalog`] so that every repository implementation applies them identically
//!
//! # Order Placement Flow
//!
//! 1. HTTP handler validates the order request
//! 2. [`crate::application::services::OrderService`] passes a [`entities::NewOrder`] to the repository
//! 3. The repository locks the product rows and runs [`catalog::check_stock`]
//! 4. Lines are priced with [`catalog::price_lines`], then order and stock are written atomically

pub mod catalog;
pub mod entities;
pub mod repositories;
