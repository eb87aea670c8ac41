//! HTTP request handlers.
//!
//! Each module exposes its public routes and, where it has any, the routes
//! that sit behind the bearer middleware.

pub mod auth_handler;
pub mod category_handler;
pub mod order_handler;
pub mod product_handler;
pub mod review_handler;
pub mod user_handler;

pub use auth_handler::{auth_protected_routes, auth_routes};
pub use category_handler::{category_protected_routes, category_routes};
pub use order_handler::order_routes;
pub use product_handler::{product_protected_routes, product_routes};
pub use review_handler::{review_protected_routes, review_routes};
pub use user_handler::user_routes;
