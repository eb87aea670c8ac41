//! Category repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use super::entities::category::{self, ActiveModel, Entity as CategoryEntity};
use super::is_unique_violation;
use crate::domain::{Category, NewCategory};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Active categories in id order
    async fn list_active(&self) -> AppResult<Vec<Category>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Category>>;

    /// Insert a category; duplicate names are a conflict
    async fn create(&self, data: NewCategory) -> AppResult<Category>;

    async fn count(&self) -> AppResult<u64>;
}

pub struct CategoryStore {
    db: DatabaseConnection,
}

impl CategoryStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for CategoryStore {
    async fn list_active(&self) -> AppResult<Vec<Category>> {
        let models = CategoryEntity::find()
            .filter(category::Column::IsActive.eq(true))
            .order_by_asc(category::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Category::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Category>> {
        Ok(CategoryEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Category::from))
    }

    async fn create(&self, data: NewCategory) -> AppResult<Category> {
        let active_model = ActiveModel {
            name: Set(data.name),
            description: Set(data.description),
            image_url: Set(data.image_url),
            is_active: Set(true),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        match active_model.insert(&self.db).await {
            Ok(model) => Ok(model.into()),
            Err(e) if is_unique_violation(&e) => {
                Err(AppError::conflict("Category name already exists"))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(CategoryEntity::find().count(&self.db).await?)
    }
}
