//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    auth_handler, category_handler, order_handler, product_handler, review_handler, user_handler,
};
use crate::domain::{
    CartLine, Category, CustomerProfile, CustomerProfilePatch, FarmerProfile, FarmerProfilePatch,
    NewCategory, NewOrder, NewProduct, NewReview, OrderItem, OrderPatch, OrderResponse,
    OrderStatus, OrderStatusHistory, ProductPatch, ProductResponse, Profile, RegisterUser, Review,
    SetUserActive, UserPatch, UserResponse, UserRole,
};
use crate::services::TokenResponse;
use crate::types::MessageResponse;

/// OpenAPI documentation for the marketplace API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Farm Market API",
        version = "0.1.0",
        description = "Marketplace connecting local farmers with customers",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        auth_handler::me,
        user_handler::get_current_user,
        user_handler::update_current_user,
        user_handler::get_profile,
        user_handler::update_farmer_profile,
        user_handler::update_customer_profile,
        user_handler::set_user_active,
        category_handler::list_categories,
        category_handler::create_category,
        product_handler::list_products,
        product_handler::get_product,
        product_handler::create_product,
        product_handler::update_product,
        product_handler::delete_product,
        product_handler::my_products,
        order_handler::create_order,
        order_handler::list_orders,
        order_handler::get_order,
        order_handler::update_order,
        review_handler::create_review,
        review_handler::user_reviews,
    ),
    components(
        schemas(
            UserRole,
            UserResponse,
            RegisterUser,
            UserPatch,
            SetUserActive,
            Profile,
            FarmerProfile,
            FarmerProfilePatch,
            CustomerProfile,
            CustomerProfilePatch,
            Category,
            NewCategory,
            ProductResponse,
            NewProduct,
            ProductPatch,
            OrderStatus,
            OrderResponse,
            OrderItem,
            OrderStatusHistory,
            CartLine,
            NewOrder,
            OrderPatch,
            Review,
            NewReview,
            auth_handler::LoginRequest,
            TokenResponse,
            MessageResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and token resolution"),
        (name = "Users", description = "Own account, role profiles and activation"),
        (name = "Catalog", description = "Categories and products"),
        (name = "Orders", description = "Order placement and tracking"),
        (name = "Reviews", description = "Post-order reviews")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_order_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/orders"));
        assert!(doc.paths.paths.contains_key("/orders/{id}"));
        assert!(doc.paths.paths.contains_key("/products/farmer/my-products"));
    }
}
