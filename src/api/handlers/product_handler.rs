//! Product catalog handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::api::extractors::{JsonBody, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::config::DEFAULT_PAGE_LIMIT;
use crate::domain::{NewProduct, ProductFilter, ProductPatch, ProductResponse, UserRole};
use crate::errors::AppResult;
use crate::types::{Created, MessageResponse};

/// Listing filters; `limit` is clamped to 1..=100
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    pub category_id: Option<i32>,
    pub farmer_id: Option<Uuid>,
    pub is_organic: Option<bool>,
    /// Case-sensitive substring of the product name
    pub search: Option<String>,
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_LIMIT
}

impl From<ProductQuery> for ProductFilter {
    fn from(q: ProductQuery) -> Self {
        Self {
            category_id: q.category_id,
            farmer_id: q.farmer_id,
            is_organic: q.is_organic,
            search: q.search,
            skip: q.skip,
            limit: q.limit,
        }
    }
}

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/:id", get(get_product))
}

pub fn product_protected_routes() -> Router<AppState> {
    Router::new()
        .route("/products", post(create_product))
        .route("/products/:id", put(update_product).delete(delete_product))
        .route("/products/farmer/my-products", get(my_products))
}

/// Browse available products
#[utoipa::path(
    get,
    path = "/products",
    tag = "Catalog",
    params(ProductQuery),
    responses((status = 200, description = "Active products with stock", body = [ProductResponse]))
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<Vec<ProductResponse>>> {
    let products = state.catalog_service.list_products(query.into()).await?;
    Ok(Json(products))
}

/// Product detail with farmer and category
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "Catalog",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product", body = ProductResponse),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ProductResponse>> {
    Ok(Json(state.catalog_service.get_product(id).await?))
}

/// List a product (farmer only)
#[utoipa::path(
    post,
    path = "/products",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    request_body = NewProduct,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 403, description = "Farmer access required"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    ValidatedJson(payload): ValidatedJson<NewProduct>,
) -> AppResult<Created<ProductResponse>> {
    identity.require(UserRole::Farmer)?;
    let product = state.catalog_service.create_product(&identity, payload).await?;
    Ok(Created(product))
}

/// Update an owned product; only present fields change
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Product ID")),
    request_body = ProductPatch,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 403, description = "Not the owning farmer"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<i32>,
    JsonBody(patch): JsonBody<ProductPatch>,
) -> AppResult<Json<ProductResponse>> {
    identity.require(UserRole::Farmer)?;
    let product = state
        .catalog_service
        .update_product(&identity, id, patch)
        .await?;
    Ok(Json(product))
}

/// Delete an owned product
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 403, description = "Not the owning farmer"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Product has orders")
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    identity.require(UserRole::Farmer)?;
    state.catalog_service.delete_product(&identity, id).await?;
    Ok(Json(MessageResponse::new("Product deleted successfully")))
}

/// All of the caller's products, including inactive and sold out
#[utoipa::path(
    get,
    path = "/products/farmer/my-products",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Farmer's products", body = [ProductResponse]),
        (status = 403, description = "Farmer access required")
    )
)]
pub async fn my_products(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
) -> AppResult<Json<Vec<ProductResponse>>> {
    identity.require(UserRole::Farmer)?;
    Ok(Json(state.catalog_service.farmer_products(&identity).await?))
}
