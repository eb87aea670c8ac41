//! User repository implementation.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{User, UserChanges};
use crate::errors::{AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Creation goes through the transactional repository so the user and its
/// profile are written together.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Apply name/phone changes
    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User>;

    /// Activate or deactivate an account
    async fn set_active(&self, id: Uuid, is_active: bool) -> AppResult<User>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load(&self, id: Uuid) -> AppResult<user::Model> {
        UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("User")
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User> {
        let mut active: ActiveModel = self.load(id).await?.into();

        if let Some(first_name) = changes.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = changes.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(phone) = changes.phone {
            active.phone = Set(phone);
        }
        active.updated_at = Set(chrono::Utc::now());

        User::try_from(active.update(&self.db).await?)
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> AppResult<User> {
        let mut active: ActiveModel = self.load(id).await?.into();
        active.is_active = Set(is_active);
        active.updated_at = Set(chrono::Utc::now());

        User::try_from(active.update(&self.db).await?)
    }
}
