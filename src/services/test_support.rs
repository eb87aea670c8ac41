//! Hand-written Unit of Work over mocked repositories for service tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Money, Order, OrderDetails, OrderStatus, Product, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::{
    CategoryRepository, MockCategoryRepository, MockOrderRepository, MockProductRepository,
    MockProfileRepository, MockReviewRepository, MockUserRepository, OrderRepository,
    ProductRepository, ProfileRepository, ReviewRepository, TransactionContext, UnitOfWork,
    UserRepository,
};

/// Repositories default to mocks without expectations, which panic if called.
pub struct TestUnitOfWork {
    users: Arc<MockUserRepository>,
    profiles: Arc<MockProfileRepository>,
    categories: Arc<MockCategoryRepository>,
    products: Arc<MockProductRepository>,
    orders: Arc<MockOrderRepository>,
    reviews: Arc<MockReviewRepository>,
}

#[derive(Default)]
pub struct TestUnitOfWorkBuilder {
    users: Option<MockUserRepository>,
    profiles: Option<MockProfileRepository>,
    categories: Option<MockCategoryRepository>,
    products: Option<MockProductRepository>,
    orders: Option<MockOrderRepository>,
    reviews: Option<MockReviewRepository>,
}

impl TestUnitOfWork {
    pub fn builder() -> TestUnitOfWorkBuilder {
        TestUnitOfWorkBuilder::default()
    }
}

impl TestUnitOfWorkBuilder {
    pub fn users(mut self, repo: MockUserRepository) -> Self {
        self.users = Some(repo);
        self
    }

    pub fn profiles(mut self, repo: MockProfileRepository) -> Self {
        self.profiles = Some(repo);
        self
    }

    pub fn categories(mut self, repo: MockCategoryRepository) -> Self {
        self.categories = Some(repo);
        self
    }

    pub fn products(mut self, repo: MockProductRepository) -> Self {
        self.products = Some(repo);
        self
    }

    pub fn orders(mut self, repo: MockOrderRepository) -> Self {
        self.orders = Some(repo);
        self
    }

    pub fn reviews(mut self, repo: MockReviewRepository) -> Self {
        self.reviews = Some(repo);
        self
    }

    pub fn build(self) -> TestUnitOfWork {
        TestUnitOfWork {
            users: Arc::new(self.users.unwrap_or_default()),
            profiles: Arc::new(self.profiles.unwrap_or_default()),
            categories: Arc::new(self.categories.unwrap_or_default()),
            products: Arc::new(self.products.unwrap_or_default()),
            orders: Arc::new(self.orders.unwrap_or_default()),
            reviews: Arc::new(self.reviews.unwrap_or_default()),
        }
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn profiles(&self) -> Arc<dyn ProfileRepository> {
        self.profiles.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.categories.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.products.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.orders.clone()
    }

    fn reviews(&self) -> Arc<dyn ReviewRepository> {
        self.reviews.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        // Transactional paths are covered by the SQLite integration tests
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}

pub fn sample_user(role: UserRole) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        email: format!("{}@example.com", role),
        password_hash: "hashed".to_string(),
        role,
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        phone: None,
        is_active: true,
        is_verified: false,
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_product(id: i32, farmer_id: Uuid) -> Product {
    let now = Utc::now();
    Product {
        id,
        farmer_id,
        category_id: 1,
        name: format!("Product {}", id),
        description: None,
        price_per_unit: Money::from_cents(499),
        unit_type: "kg".to_string(),
        quantity_available: 50,
        min_order_quantity: 1,
        is_organic: false,
        is_active: true,
        harvest_date: None,
        expiry_date: None,
        image_urls: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_order(id: i32, customer_id: Uuid, farmer_id: Uuid) -> OrderDetails {
    let now = Utc::now();
    OrderDetails {
        order: Order {
            id,
            customer_id,
            farmer_id,
            status: OrderStatus::Pending,
            total_amount: Money::from_cents(2993),
            delivery_address: "12 Orchard Rd".to_string(),
            delivery_date: None,
            delivery_time: None,
            notes: None,
            created_at: now,
            updated_at: now,
        },
        items: Vec::new(),
        history: None,
    }
}
