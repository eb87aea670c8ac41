//! Order handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};

use crate::api::extractors::{JsonBody, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{NewOrder, OrderPatch, OrderResponse, UserRole};
use crate::errors::AppResult;
use crate::types::Created;

/// Order routes; all require authentication
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/:id", get(get_order).put(update_order))
}

/// Place an order (customer only)
#[utoipa::path(
    post,
    path = "/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    request_body = NewOrder,
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 400, description = "Empty cart, unavailable product, short stock or below minimum"),
        (status = 403, description = "Customer access required"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Items from more than one farmer")
    )
)]
pub async fn create_order(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    ValidatedJson(payload): ValidatedJson<NewOrder>,
) -> AppResult<Created<OrderResponse>> {
    identity.require(UserRole::Customer)?;
    let details = state.order_service.create_order(&identity, payload).await?;
    Ok(Created(OrderResponse::from(details)))
}

/// Orders visible to the caller
#[utoipa::path(
    get,
    path = "/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Orders, newest first", body = [OrderResponse]))
)]
pub async fn list_orders(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
) -> AppResult<Json<Vec<OrderResponse>>> {
    let orders = state.order_service.list_orders(&identity).await?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

/// Order with items and status history
#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order", body = OrderResponse),
        (status = 403, description = "Not a party to this order"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<i32>,
) -> AppResult<Json<OrderResponse>> {
    let details = state.order_service.get_order(&identity, id).await?;
    Ok(Json(OrderResponse::from(details)))
}

/// Update status or delivery details (order's farmer or customer)
#[utoipa::path(
    put,
    path = "/orders/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Order ID")),
    request_body = OrderPatch,
    responses(
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 403, description = "Not a party to this order"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn update_order(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<i32>,
    JsonBody(patch): JsonBody<OrderPatch>,
) -> AppResult<Json<OrderResponse>> {
    let details = state.order_service.update_order(&identity, id, patch).await?;
    Ok(Json(OrderResponse::from(details)))
}
