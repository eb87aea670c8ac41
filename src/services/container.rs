//! Service Container - Centralized service access.
//!
//! Handlers depend on service traits only; the container wires the
//! concrete implementations around one shared Unit of Work.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, Catalog, CatalogService, OrderEngine, OrderService,
    ReviewManager, ReviewService, UserManager, UserService,
};
use crate::config::Config;
use crate::infra::Persistence;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn catalog(&self) -> Arc<dyn CatalogService>;

    fn orders(&self) -> Arc<dyn OrderService>;

    fn reviews(&self) -> Arc<dyn ReviewService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    catalog_service: Arc<dyn CatalogService>,
    order_service: Arc<dyn OrderService>,
    review_service: Arc<dyn ReviewService>,
}

impl Services {
    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            user_service: Arc::new(UserManager::new(uow.clone())),
            catalog_service: Arc::new(Catalog::new(uow.clone())),
            order_service: Arc::new(OrderEngine::new(uow.clone())),
            review_service: Arc::new(ReviewManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogService> {
        self.catalog_service.clone()
    }

    fn orders(&self) -> Arc<dyn OrderService> {
        self.order_service.clone()
    }

    fn reviews(&self) -> Arc<dyn ReviewService> {
        self.review_service.clone()
    }
}
