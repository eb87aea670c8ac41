//! Seed command - Reference data and the first administrator.

use crate::cli::args::{SeedArgs, SeedTarget};
use crate::config::{Config, DEFAULT_CATEGORIES};
use crate::domain::NewCategory;
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, Persistence, UnitOfWork};
use crate::services::{ServiceContainer, Services};

/// Execute the seed command
pub async fn execute(args: SeedArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    match args.target {
        SeedTarget::Categories => {
            let uow = Persistence::new(db.get_connection());
            let inserted = seed_default_categories(&uow).await?;
            if inserted == 0 {
                tracing::info!("Categories already present, nothing to seed");
            } else {
                tracing::info!("Seeded {} categories", inserted);
            }
        }
        SeedTarget::Admin {
            email,
            password,
            first_name,
            last_name,
        } => {
            let services = Services::from_connection(db.get_connection(), config);
            let admin = services
                .auth()
                .register_admin(email, password, first_name, last_name)
                .await?;
            tracing::info!(user_id = %admin.id, email = %admin.email, "Admin account created");
        }
    }

    Ok(())
}

/// Insert the default categories into an empty category table.
///
/// Returns how many were inserted; zero when any category already exists.
pub async fn seed_default_categories<U: UnitOfWork>(uow: &U) -> AppResult<usize> {
    let categories = uow.categories();
    if categories.count().await? > 0 {
        return Ok(0);
    }

    for (name, description) in DEFAULT_CATEGORIES {
        categories
            .create(NewCategory {
                name: name.to_string(),
                description: Some(description.to_string()),
                image_url: None,
            })
            .await?;
    }
    Ok(DEFAULT_CATEGORIES.len())
}
