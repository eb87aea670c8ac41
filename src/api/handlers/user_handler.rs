//! Own account and profile handlers, plus the admin activation toggle.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, put},
    Router,
};
use uuid::Uuid;

use crate::api::extractors::JsonBody;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{
    CustomerProfile, CustomerProfilePatch, FarmerProfile, FarmerProfilePatch, Profile,
    SetUserActive, UserPatch, UserResponse, UserRole,
};
use crate::errors::AppResult;

/// User routes; all require authentication
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(get_current_user).put(update_current_user))
        .route("/users/me/profile", get(get_profile))
        .route("/users/me/profile/farmer", put(update_farmer_profile))
        .route("/users/me/profile/customer", put(update_customer_profile))
        .route("/users/:id/active", put(set_user_active))
}

/// Get the caller's user record
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get_user(identity.id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Update the caller's names or phone; omitted fields are left alone
#[utoipa::path(
    put,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UserPatch,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn update_current_user(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    JsonBody(patch): JsonBody<UserPatch>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.update_user(identity.id, patch).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Get the caller's farmer or customer profile
#[utoipa::path(
    get,
    path = "/users/me/profile",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Role profile", body = Profile),
        (status = 404, description = "No profile for this role")
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
) -> AppResult<Json<Profile>> {
    Ok(Json(state.user_service.profile(&identity).await?))
}

#[utoipa::path(
    put,
    path = "/users/me/profile/farmer",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = FarmerProfilePatch,
    responses(
        (status = 200, description = "Farmer profile updated", body = FarmerProfile),
        (status = 403, description = "Caller is not a farmer")
    )
)]
pub async fn update_farmer_profile(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    JsonBody(patch): JsonBody<FarmerProfilePatch>,
) -> AppResult<Json<FarmerProfile>> {
    let profile = state
        .user_service
        .update_farmer_profile(&identity, patch)
        .await?;
    Ok(Json(profile))
}

#[utoipa::path(
    put,
    path = "/users/me/profile/customer",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CustomerProfilePatch,
    responses(
        (status = 200, description = "Customer profile updated", body = CustomerProfile),
        (status = 403, description = "Caller is not a customer")
    )
)]
pub async fn update_customer_profile(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    JsonBody(patch): JsonBody<CustomerProfilePatch>,
) -> AppResult<Json<CustomerProfile>> {
    let profile = state
        .user_service
        .update_customer_profile(&identity, patch)
        .await?;
    Ok(Json(profile))
}

/// Activate or deactivate an account (admin only)
#[utoipa::path(
    put,
    path = "/users/{id}/active",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = SetUserActive,
    responses(
        (status = 200, description = "Activation flag updated", body = UserResponse),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn set_user_active(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<Uuid>,
    JsonBody(payload): JsonBody<SetUserActive>,
) -> AppResult<Json<UserResponse>> {
    identity.require(UserRole::Admin)?;
    let user = state.user_service.set_active(id, payload.is_active).await?;
    Ok(Json(UserResponse::from(user)))
}
