//! Review repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::review::{self, ActiveModel, Entity as ReviewEntity};
use super::is_unique_violation;
use crate::domain::Review;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Row to insert for a new review
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRecord {
    pub order_id: i32,
    pub reviewer_id: Uuid,
    pub reviewed_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Insert; a second review of the same order by the same reviewer conflicts
    async fn create(&self, record: ReviewRecord) -> AppResult<Review>;

    /// Reviews received by a user, newest first
    async fn list_for_user(&self, reviewed_id: Uuid) -> AppResult<Vec<Review>>;
}

pub struct ReviewStore {
    db: DatabaseConnection,
}

impl ReviewStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReviewRepository for ReviewStore {
    async fn create(&self, record: ReviewRecord) -> AppResult<Review> {
        let active_model = ActiveModel {
            order_id: Set(record.order_id),
            reviewer_id: Set(record.reviewer_id),
            reviewed_id: Set(record.reviewed_id),
            rating: Set(record.rating),
            comment: Set(record.comment),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        match active_model.insert(&self.db).await {
            Ok(model) => Ok(model.into()),
            Err(e) if is_unique_violation(&e) => {
                Err(AppError::conflict("Order already reviewed"))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list_for_user(&self, reviewed_id: Uuid) -> AppResult<Vec<Review>> {
        let models = ReviewEntity::find()
            .filter(review::Column::ReviewedId.eq(reviewed_id))
            .order_by_desc(review::Column::CreatedAt)
            .order_by_desc(review::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Review::from).collect())
    }
}
