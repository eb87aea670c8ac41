//! Review handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{NewReview, Review};
use crate::errors::AppResult;
use crate::types::Created;

pub fn review_routes() -> Router<AppState> {
    Router::new().route("/reviews/users/:id", get(user_reviews))
}

pub fn review_protected_routes() -> Router<AppState> {
    Router::new().route("/reviews", post(create_review))
}

/// Review the other party of an order
#[utoipa::path(
    post,
    path = "/reviews",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    request_body = NewReview,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 403, description = "Not a party to the order"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order already reviewed")
    )
)]
pub async fn create_review(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    ValidatedJson(payload): ValidatedJson<NewReview>,
) -> AppResult<Created<Review>> {
    let review = state.review_service.create_review(&identity, payload).await?;
    Ok(Created(review))
}

/// Reviews a user has received
#[utoipa::path(
    get,
    path = "/reviews/users/{id}",
    tag = "Reviews",
    params(("id" = Uuid, Path, description = "Reviewed user ID")),
    responses((status = 200, description = "Reviews, newest first", body = [Review]))
)]
pub async fn user_reviews(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<Review>>> {
    Ok(Json(state.review_service.reviews_for(id).await?))
}
