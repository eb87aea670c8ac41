//! Review service - one review per party per order.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Identity, NewReview, Review};
use crate::errors::{AppError, AppResult};
use crate::infra::{ReviewRecord, UnitOfWork};

#[async_trait]
pub trait ReviewService: Send + Sync {
    /// Review the other party of an order the caller took part in
    async fn create_review(&self, reviewer: &Identity, data: NewReview) -> AppResult<Review>;

    /// Reviews received by `user_id`
    async fn reviews_for(&self, user_id: Uuid) -> AppResult<Vec<Review>>;
}

pub struct ReviewManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ReviewManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> ReviewService for ReviewManager<U> {
    async fn create_review(&self, reviewer: &Identity, data: NewReview) -> AppResult<Review> {
        let order = self
            .uow
            .orders()
            .find_by_id(data.order_id)
            .await?
            .ok_or(AppError::OrderNotFound(data.order_id))?;

        let reviewed_id = order.counterparty(reviewer.id).ok_or(AppError::Forbidden)?;

        self.uow
            .reviews()
            .create(ReviewRecord {
                order_id: order.id,
                reviewer_id: reviewer.id,
                reviewed_id,
                rating: data.rating,
                comment: data.comment,
            })
            .await
    }

    async fn reviews_for(&self, user_id: Uuid) -> AppResult<Vec<Review>> {
        self.uow.reviews().list_for_user(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::infra::{MockOrderRepository, MockReviewRepository};
    use crate::services::test_support::{sample_order, sample_user, TestUnitOfWork};
    use chrono::Utc;

    #[tokio::test]
    async fn test_customer_reviews_the_farmer() {
        let customer = Identity::from(&sample_user(UserRole::Customer));
        let farmer_id = Uuid::new_v4();
        let customer_id = customer.id;

        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_id()
            .returning(move |id| Ok(Some(sample_order(id, customer_id, farmer_id).order)));

        let expected = ReviewRecord {
            order_id: 9,
            reviewer_id: customer_id,
            reviewed_id: farmer_id,
            rating: 5,
            comment: Some("Great carrots".to_string()),
        };
        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_create()
            .withf(move |record| *record == expected)
            .returning(|record| {
                Ok(Review {
                    id: 1,
                    order_id: record.order_id,
                    reviewer_id: record.reviewer_id,
                    reviewed_id: record.reviewed_id,
                    rating: record.rating,
                    comment: record.comment,
                    created_at: Utc::now(),
                })
            });

        let uow = TestUnitOfWork::builder().orders(orders).reviews(reviews).build();
        let review = ReviewManager::new(Arc::new(uow))
            .create_review(
                &customer,
                NewReview {
                    order_id: 9,
                    rating: 5,
                    comment: Some("Great carrots".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(review.reviewed_id, farmer_id);
    }

    #[tokio::test]
    async fn test_outsider_cannot_review() {
        let mut orders = MockOrderRepository::new();
        orders.expect_find_by_id().returning(|id| {
            Ok(Some(sample_order(id, Uuid::new_v4(), Uuid::new_v4()).order))
        });
        let mut reviews = MockReviewRepository::new();
        reviews.expect_create().never();

        let uow = TestUnitOfWork::builder().orders(orders).reviews(reviews).build();
        let outsider = Identity::from(&sample_user(UserRole::Customer));
        let result = ReviewManager::new(Arc::new(uow))
            .create_review(
                &outsider,
                NewReview {
                    order_id: 1,
                    rating: 3,
                    comment: None,
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }
}
