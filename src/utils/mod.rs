//! Helpers shared by the server and the admin tool.
//!
//! - [`slug`] - Slug derivation and validation
//! - [`order_number`] - Random public order numbers
//! - [`db_error`] - Database error classification

pub mod db_error;
pub mod order_number;
pub mod slug;
