//! Post-order reviews between the two parties of an order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Review {
    pub id: i32,
    pub order_id: i32,
    pub reviewer_id: Uuid,
    pub reviewed_id: Uuid,
    #[schema(example = 5, minimum = 1, maximum = 5)]
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewReview {
    #[schema(example = 1)]
    pub order_id: i32,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    #[schema(example = 5)]
    pub rating: i32,
    #[schema(example = "Crisp lettuce, friendly farmer")]
    pub comment: Option<String>,
}
