//! HTTP-level tests: routing, auth middleware, status codes and error bodies.
//!
//! Requests go through the full router with `tower::ServiceExt::oneshot`
//! against an in-memory database.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use common::{body_json, get_request, json_request, TestApp, PASSWORD};
use farm_market::domain::UserRole;

#[tokio::test]
async fn test_health_and_banner() {
    let app = TestApp::new().await;

    let response = app.router().oneshot(get_request("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");

    let response = app.router().oneshot(get_request("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Farm Market API");
}

#[tokio::test]
async fn test_register_login_and_me() {
    let app = TestApp::new().await;

    let response = app
        .router()
        .oneshot(json_request(
            "POST",
            "/auth/register",
            None,
            json!({
                "email": "ada@example.com",
                "password": PASSWORD,
                "role": "farmer",
                "first_name": "Ada",
                "last_name": "Greenfield"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let user = body_json(response).await;
    assert_eq!(user["role"], "farmer");
    assert!(user.get("password_hash").is_none());

    let response = app
        .router()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            None,
            json!({ "email": "ada@example.com", "password": PASSWORD }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let token = body_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .router()
        .oneshot(get_request("/auth/me", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["email"], "ada@example.com");
}

#[tokio::test]
async fn test_protected_routes_need_a_token() {
    let app = TestApp::new().await;

    let response = app.router().oneshot(get_request("/orders", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"]["code"], "UNAUTHORIZED");

    let response = app
        .router()
        .oneshot(get_request("/auth/me", Some("not-a-jwt")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_public_catalog_needs_no_token() {
    let app = TestApp::new().await;
    let farmer = app.register(UserRole::Farmer, "farmer@example.com").await;
    let veg = app.category("Vegetables").await;
    let product = app.product(&farmer, veg.id, "Carrots", "1.50", 40).await;

    let response = app
        .router()
        .oneshot(get_request("/products?search=Carr", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["price_per_unit"], "1.50");

    let response = app
        .router()
        .oneshot(get_request(&format!("/products/{}", product.id), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router()
        .oneshot(get_request("/products/9999", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"]["code"], "PRODUCT_NOT_FOUND");
}

#[tokio::test]
async fn test_role_gates() {
    let app = TestApp::new().await;
    app.register(UserRole::Farmer, "farmer@example.com").await;
    app.register(UserRole::Customer, "customer@example.com").await;
    let farmer_token = app.token("farmer@example.com").await;
    let customer_token = app.token("customer@example.com").await;

    let response = app
        .router()
        .oneshot(json_request(
            "POST",
            "/orders",
            Some(&farmer_token),
            json!({
                "items": [{ "product_id": 1, "quantity": 1 }],
                "delivery_address": "1 Mill Lane"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"]["code"], "FORBIDDEN");

    let response = app
        .router()
        .oneshot(json_request(
            "POST",
            "/categories",
            Some(&customer_token),
            json!({ "name": "Honey" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_order_flow_over_http() {
    let app = TestApp::new().await;
    let farmer = app.register(UserRole::Farmer, "farmer@example.com").await;
    app.register(UserRole::Customer, "customer@example.com").await;
    let veg = app.category("Vegetables").await;
    let tomatoes = app.product(&farmer, veg.id, "Tomatoes", "4.99", 50).await;
    let lettuce = app.product(&farmer, veg.id, "Lettuce", "2.49", 30).await;
    let customer_token = app.token("customer@example.com").await;
    let farmer_token = app.token("farmer@example.com").await;

    let response = app
        .router()
        .oneshot(json_request(
            "POST",
            "/orders",
            Some(&customer_token),
            json!({
                "items": [
                    { "product_id": tomatoes.id, "quantity": 5 },
                    { "product_id": lettuce.id, "quantity": 2 }
                ],
                "delivery_address": "12 Orchard Rd, Springfield",
                "delivery_time": "morning"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let order = body_json(response).await;
    assert_eq!(order["status"], "pending");
    assert_eq!(order["total_amount"], "29.93");
    assert_eq!(order["items"].as_array().unwrap().len(), 2);
    let order_id = order["id"].as_i64().unwrap();

    let response = app
        .router()
        .oneshot(json_request(
            "PUT",
            &format!("/orders/{}", order_id),
            Some(&farmer_token),
            json!({ "status": "accepted" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["status"], "accepted");
    assert_eq!(updated["status_history"].as_array().unwrap().len(), 2);

    let response = app
        .router()
        .oneshot(json_request(
            "POST",
            "/orders",
            Some(&customer_token),
            json!({
                "items": [{ "product_id": tomatoes.id, "quantity": 500 }],
                "delivery_address": "12 Orchard Rd, Springfield"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "INSUFFICIENT_STOCK");

    let response = app
        .router()
        .oneshot(get_request("/orders", Some(&customer_token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_payloads_are_validation_errors() {
    let app = TestApp::new().await;

    let response = app
        .router()
        .oneshot(json_request(
            "POST",
            "/auth/register",
            None,
            json!({
                "email": "not-an-email",
                "password": PASSWORD,
                "role": "customer",
                "first_name": "Ada",
                "last_name": "Greenfield"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");

    let response = app
        .router()
        .oneshot(json_request("POST", "/auth/login", None, json!({ "email": 5 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = TestApp::new().await;
    let response = app
        .router()
        .oneshot(get_request("/api-docs/openapi.json", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let doc = body_json(response).await;
    assert!(doc["paths"]["/orders"].is_object());
}
