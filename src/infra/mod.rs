//! Infrastructure layer - External systems integration
//!
//! - Database connection and migrations
//! - Repositories over SeaORM entities
//! - Unit of Work for transaction management

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    CategoryRepository, OrderRepository, OrderScope, ProductRepository, ProfileRepository,
    ReviewRecord, ReviewRepository, UserRepository,
};
pub use unit_of_work::{
    NewUserRecord, Persistence, TransactionContext, TxOrderRepository, TxProductRepository,
    TxUserRepository, UnitOfWork,
};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockCategoryRepository, MockOrderRepository, MockProductRepository, MockProfileRepository,
    MockReviewRepository, MockUserRepository,
};
