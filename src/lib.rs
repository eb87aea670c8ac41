//! Farm Market - Marketplace backend connecting local farmers with customers
//!
//! Farmers list produce, customers place single-farmer orders that are
//! priced, stock-checked and persisted in one transaction, and both sides
//! track order status and review each other afterwards.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities, cart pricing and the access gate
//! - **services**: Application use cases
//! - **infra**: Database, repositories and the Unit of Work
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared response types
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Insert the default categories and an admin account
//! cargo run -- seed categories
//! cargo run -- seed admin --email admin@example.com --password change-me
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Identity, Money, Password, User, UserRole};
pub use errors::{AppError, AppResult};
