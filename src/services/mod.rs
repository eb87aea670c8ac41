//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! All services use Unit of Work pattern for centralized repository
//! access and transaction management.

mod auth_service;
mod catalog_service;
pub mod container;
mod order_service;
mod review_service;
mod user_service;

#[cfg(test)]
pub(crate) mod test_support;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use catalog_service::{Catalog, CatalogService};
pub use order_service::{OrderEngine, OrderService};
pub use review_service::{ReviewManager, ReviewService};
pub use user_service::{UserManager, UserService};
