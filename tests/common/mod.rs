//! Shared fixtures for integration tests.
//!
//! Every test gets its own in-memory SQLite database behind a pool of
//! exactly one connection, so the schema lives as long as the pool.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::Router;
use sea_orm::{ConnectOptions, Database as SeaDatabase};

use farm_market::api::{create_router, AppState};
use farm_market::config::Config;
use farm_market::domain::{
    Category, Identity, Money, NewCategory, NewProduct, ProductResponse, RegisterUser, UserRole,
};
use farm_market::infra::Database;
use farm_market::services::{ServiceContainer, Services};

pub const PASSWORD: &str = "correct horse battery";

pub struct TestApp {
    pub db: Arc<Database>,
    pub services: Services,
    pub config: Config,
}

impl TestApp {
    pub async fn new() -> Self {
        let config = Config::new(
            "sqlite::memory:",
            "integration-test-secret-at-least-32-chars",
        );

        let mut options = ConnectOptions::new(config.database_url.clone());
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let connection = SeaDatabase::connect(options)
            .await
            .expect("open in-memory sqlite");

        let db = Database::from_connection(connection);
        db.run_migrations().await.expect("apply migrations");

        let services = Services::from_connection(db.get_connection(), config.clone());
        Self {
            db: Arc::new(db),
            services,
            config,
        }
    }

    pub fn router(&self) -> Router {
        let state = AppState::from_container(&self.services, self.db.clone());
        create_router(state, &self.config.allowed_origins)
    }

    /// Register a user with [`PASSWORD`] and return its identity.
    pub async fn register(&self, role: UserRole, email: &str) -> Identity {
        let user = self
            .services
            .auth()
            .register(RegisterUser {
                email: email.to_string(),
                password: PASSWORD.to_string(),
                role,
                first_name: "Test".to_string(),
                last_name: role.to_string(),
                phone: None,
            })
            .await
            .expect("register user");
        Identity::from(&user)
    }

    pub async fn admin(&self, email: &str) -> Identity {
        let user = self
            .services
            .auth()
            .register_admin(
                email.to_string(),
                PASSWORD.to_string(),
                "Site".to_string(),
                "Admin".to_string(),
            )
            .await
            .expect("register admin");
        Identity::from(&user)
    }

    pub async fn token(&self, email: &str) -> String {
        self.services
            .auth()
            .login(email.to_string(), PASSWORD.to_string())
            .await
            .expect("login")
            .access_token
    }

    pub async fn category(&self, name: &str) -> Category {
        self.services
            .catalog()
            .create_category(NewCategory {
                name: name.to_string(),
                description: None,
                image_url: None,
            })
            .await
            .expect("create category")
    }

    pub async fn product(
        &self,
        farmer: &Identity,
        category_id: i32,
        name: &str,
        price: &str,
        stock: i32,
    ) -> ProductResponse {
        self.services
            .catalog()
            .create_product(farmer, new_product(category_id, name, price, stock))
            .await
            .expect("create product")
    }

    pub async fn stock_of(&self, product_id: i32) -> i32 {
        self.services
            .catalog()
            .get_product(product_id)
            .await
            .expect("load product")
            .quantity_available
    }
}

pub fn new_product(category_id: i32, name: &str, price: &str, stock: i32) -> NewProduct {
    NewProduct {
        category_id,
        name: name.to_string(),
        description: None,
        price_per_unit: price.parse::<Money>().expect("valid price"),
        unit_type: "kg".to_string(),
        quantity_available: stock,
        min_order_quantity: 1,
        is_organic: false,
        harvest_date: None,
        expiry_date: None,
        image_urls: Vec::new(),
    }
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}
