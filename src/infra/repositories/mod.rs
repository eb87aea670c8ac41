//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

pub(crate) mod entities;
mod category_repository;
mod order_repository;
mod product_repository;
mod profile_repository;
mod review_repository;
mod user_repository;

use sea_orm::{DbErr, SqlErr};

pub use category_repository::{CategoryRepository, CategoryStore};
pub(crate) use order_repository::load_details;
pub use order_repository::{OrderRepository, OrderScope, OrderStore};
pub use product_repository::{ProductRepository, ProductStore};
pub use profile_repository::{ProfileRepository, ProfileStore};
pub use review_repository::{ReviewRecord, ReviewRepository, ReviewStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use category_repository::MockCategoryRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use order_repository::MockOrderRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use product_repository::MockProductRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use profile_repository::MockProfileRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use review_repository::MockReviewRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;

pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
