//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.
//! Money columns hold integer cents.

pub mod category;
pub mod customer_profile;
pub mod farmer_profile;
pub mod order;
pub mod order_item;
pub mod order_status_history;
pub mod product;
pub mod review;
pub mod user;
