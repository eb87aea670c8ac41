//! Category handlers.

use axum::{extract::State, response::Json, routing::get, Router};

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{Category, NewCategory, UserRole};
use crate::errors::AppResult;
use crate::types::Created;

pub fn category_routes() -> Router<AppState> {
    Router::new().route("/categories", get(list_categories))
}

pub fn category_protected_routes() -> Router<AppState> {
    Router::new().route("/categories", axum::routing::post(create_category))
}

/// List active categories
#[utoipa::path(
    get,
    path = "/categories",
    tag = "Catalog",
    responses((status = 200, description = "Active categories", body = [Category]))
)]
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(state.catalog_service.list_categories().await?))
}

/// Create a category (admin only)
#[utoipa::path(
    post,
    path = "/categories",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    request_body = NewCategory,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 403, description = "Admin access required"),
        (status = 409, description = "Category name already exists")
    )
)]
pub async fn create_category(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    ValidatedJson(payload): ValidatedJson<NewCategory>,
) -> AppResult<Created<Category>> {
    identity.require(UserRole::Admin)?;
    Ok(Created(state.catalog_service.create_category(payload).await?))
}
