//! Order placement against a real database: atomicity, stock accounting
//! and party rules.

mod common;

use futures::future::join_all;

use common::TestApp;
use farm_market::domain::{
    CartLine, Identity, Money, NewOrder, OrderPatch, OrderStatus, Patch, ProductPatch, UserRole,
};
use farm_market::errors::AppError;
use farm_market::infra::{Persistence, UnitOfWork};
use farm_market::services::ServiceContainer;

fn cart(lines: &[(i32, i32)]) -> NewOrder {
    NewOrder {
        items: lines
            .iter()
            .map(|&(product_id, quantity)| CartLine {
                product_id,
                quantity,
            })
            .collect(),
        delivery_address: "12 Orchard Rd, Springfield".to_string(),
        delivery_date: None,
        delivery_time: Some("morning".to_string()),
        notes: None,
    }
}

struct Market {
    app: TestApp,
    farmer: Identity,
    customer: Identity,
    tomatoes: i32,
    lettuce: i32,
}

/// One farmer selling tomatoes (4.99, 50 in stock) and lettuce (2.49, 30).
async fn market() -> Market {
    let app = TestApp::new().await;
    let farmer = app.register(UserRole::Farmer, "farmer@example.com").await;
    let customer = app.register(UserRole::Customer, "customer@example.com").await;
    let vegetables = app.category("Vegetables").await;
    let tomatoes = app
        .product(&farmer, vegetables.id, "Heirloom Tomatoes", "4.99", 50)
        .await
        .id;
    let lettuce = app
        .product(&farmer, vegetables.id, "Butter Lettuce", "2.49", 30)
        .await
        .id;

    Market {
        app,
        farmer,
        customer,
        tomatoes,
        lettuce,
    }
}

fn status_patch(status: OrderStatus) -> OrderPatch {
    OrderPatch {
        status: Patch::Value(status),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_order_is_priced_and_stock_decremented() {
    let m = market().await;
    let orders = m.app.services.orders();

    let details = orders
        .create_order(&m.customer, cart(&[(m.tomatoes, 5), (m.lettuce, 2)]))
        .await
        .unwrap();

    assert_eq!(details.order.status, OrderStatus::Pending);
    assert_eq!(details.order.customer_id, m.customer.id);
    assert_eq!(details.order.farmer_id, m.farmer.id);
    assert_eq!(details.order.total_amount, Money::from_cents(2993));
    assert_eq!(details.order.delivery_time.as_deref(), Some("morning"));
    assert_eq!(details.items.len(), 2);
    assert_eq!(details.items[0].unit_price, Money::from_cents(499));
    assert_eq!(details.items[0].total_price, Money::from_cents(2495));
    assert_eq!(details.items[1].total_price, Money::from_cents(498));

    let history = details.history.expect("history loaded");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, OrderStatus::Pending);
    assert_eq!(history[0].notes.as_deref(), Some("Order created"));

    assert_eq!(m.app.stock_of(m.tomatoes).await, 45);
    assert_eq!(m.app.stock_of(m.lettuce).await, 28);
}

#[tokio::test]
async fn test_insufficient_stock_leaves_nothing_behind() {
    let m = market().await;
    let orders = m.app.services.orders();

    let err = orders
        .create_order(&m.customer, cart(&[(m.tomatoes, 60)]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::InsufficientStock {
            requested: 60,
            available: 50,
            ..
        }
    ));
    assert_eq!(m.app.stock_of(m.tomatoes).await, 50);
    assert!(orders.list_orders(&m.customer).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_lines_draw_on_the_same_stock() {
    let m = market().await;
    let orders = m.app.services.orders();

    let err = orders
        .create_order(&m.customer, cart(&[(m.tomatoes, 30), (m.tomatoes, 30)]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::InsufficientStock {
            requested: 30,
            available: 20,
            ..
        }
    ));
    assert_eq!(m.app.stock_of(m.tomatoes).await, 50);

    let details = orders
        .create_order(&m.customer, cart(&[(m.tomatoes, 20), (m.tomatoes, 20)]))
        .await
        .unwrap();
    assert_eq!(details.items.len(), 2);
    assert_eq!(details.order.total_amount, Money::from_cents(19960));
    assert_eq!(m.app.stock_of(m.tomatoes).await, 10);
}

#[tokio::test]
async fn test_failure_on_a_later_line_rolls_back_earlier_ones() {
    let m = market().await;
    let orders = m.app.services.orders();

    let err = orders
        .create_order(&m.customer, cart(&[(m.tomatoes, 5), (9999, 1)]))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ProductNotFound(9999)));
    assert_eq!(m.app.stock_of(m.tomatoes).await, 50);
    assert!(orders.list_orders(&m.customer).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_items_from_two_farmers_are_rejected() {
    let m = market().await;
    let other = m.app.register(UserRole::Farmer, "other@example.com").await;
    let fruit = m.app.category("Fruits").await;
    let apples = m.app.product(&other, fruit.id, "Apples", "1.20", 100).await.id;
    let orders = m.app.services.orders();

    let err = orders
        .create_order(&m.customer, cart(&[(m.tomatoes, 1), (apples, 1)]))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::MixedFarmerOrder));
    assert_eq!(m.app.stock_of(m.tomatoes).await, 50);
    assert_eq!(m.app.stock_of(apples).await, 100);
    assert!(orders.list_orders(&m.customer).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_inactive_product_is_unavailable() {
    let m = market().await;
    m.app
        .services
        .catalog()
        .update_product(
            &m.farmer,
            m.lettuce,
            ProductPatch {
                is_active: Patch::Value(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let err = m
        .app
        .services
        .orders()
        .create_order(&m.customer, cart(&[(m.lettuce, 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ProductUnavailable(id) if id == m.lettuce));
}

#[tokio::test]
async fn test_minimum_order_quantity_is_enforced() {
    let m = market().await;
    m.app
        .services
        .catalog()
        .update_product(
            &m.farmer,
            m.tomatoes,
            ProductPatch {
                min_order_quantity: Patch::Value(3),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let err = m
        .app
        .services
        .orders()
        .create_order(&m.customer, cart(&[(m.tomatoes, 2)]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BelowMinimumOrder { min: 3, .. }));
}

#[tokio::test]
async fn test_empty_cart_and_wrong_role() {
    let m = market().await;
    let orders = m.app.services.orders();

    let err = orders.create_order(&m.customer, cart(&[])).await.unwrap_err();
    assert!(matches!(err, AppError::EmptyCart));

    let err = orders
        .create_order(&m.farmer, cart(&[(m.tomatoes, 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
}

#[tokio::test]
async fn test_line_prices_are_snapshots() {
    let m = market().await;
    let orders = m.app.services.orders();

    let placed = orders
        .create_order(&m.customer, cart(&[(m.tomatoes, 2)]))
        .await
        .unwrap();

    m.app
        .services
        .catalog()
        .update_product(
            &m.farmer,
            m.tomatoes,
            ProductPatch {
                price_per_unit: Patch::Value("9.99".parse().unwrap()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let reloaded = orders.get_order(&m.customer, placed.order.id).await.unwrap();
    assert_eq!(reloaded.items[0].unit_price, Money::from_cents(499));
    assert_eq!(reloaded.order.total_amount, Money::from_cents(998));
}

#[tokio::test]
async fn test_concurrent_orders_never_oversell() {
    let m = market().await;
    m.app
        .services
        .catalog()
        .update_product(
            &m.farmer,
            m.tomatoes,
            ProductPatch {
                quantity_available: Patch::Value(10),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let orders = m.app.services.orders();
    let attempts = (0..8).map(|_| {
        let orders = orders.clone();
        let customer = m.customer.clone();
        let data = cart(&[(m.tomatoes, 3)]);
        async move { orders.create_order(&customer, data).await }
    });
    let results = join_all(attempts).await;

    let placed = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(placed, 3);
    for err in results.into_iter().filter_map(Result::err) {
        assert!(matches!(err, AppError::InsufficientStock { .. }));
    }
    assert_eq!(m.app.stock_of(m.tomatoes).await, 1);
    assert_eq!(orders.list_orders(&m.customer).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_orders_are_scoped_to_their_parties() {
    let m = market().await;
    let stranger = m.app.register(UserRole::Customer, "stranger@example.com").await;
    let admin = m.app.admin("admin@example.com").await;
    let orders = m.app.services.orders();

    let placed = orders
        .create_order(&m.customer, cart(&[(m.tomatoes, 1)]))
        .await
        .unwrap();
    let id = placed.order.id;

    assert_eq!(orders.list_orders(&m.customer).await.unwrap().len(), 1);
    assert_eq!(orders.list_orders(&m.farmer).await.unwrap().len(), 1);
    assert_eq!(orders.list_orders(&admin).await.unwrap().len(), 1);
    assert!(orders.list_orders(&stranger).await.unwrap().is_empty());

    assert!(orders.get_order(&m.farmer, id).await.is_ok());
    assert!(orders.get_order(&admin, id).await.is_ok());
    assert!(matches!(
        orders.get_order(&stranger, id).await,
        Err(AppError::Forbidden)
    ));
    assert!(matches!(
        orders.get_order(&m.customer, id + 100).await,
        Err(AppError::OrderNotFound(_))
    ));
}

#[tokio::test]
async fn test_status_update_appends_history() {
    let m = market().await;
    let admin = m.app.admin("admin@example.com").await;
    let stranger = m.app.register(UserRole::Farmer, "stranger@example.com").await;
    let orders = m.app.services.orders();

    let id = orders
        .create_order(&m.customer, cart(&[(m.tomatoes, 1)]))
        .await
        .unwrap()
        .order
        .id;

    let updated = orders
        .update_order(&m.farmer, id, status_patch(OrderStatus::Accepted))
        .await
        .unwrap();
    assert_eq!(updated.order.status, OrderStatus::Accepted);
    let history = updated.history.expect("history loaded");
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].status, OrderStatus::Accepted);
    assert_eq!(history[1].notes.as_deref(), Some("Status updated by farmer"));

    assert!(matches!(
        orders
            .update_order(&admin, id, status_patch(OrderStatus::Cancelled))
            .await,
        Err(AppError::Forbidden)
    ));
    assert!(matches!(
        orders
            .update_order(&stranger, id, status_patch(OrderStatus::Cancelled))
            .await,
        Err(AppError::Forbidden)
    ));
    assert!(matches!(
        orders
            .update_order(&m.farmer, id + 100, status_patch(OrderStatus::Ready))
            .await,
        Err(AppError::OrderNotFound(_))
    ));

    let reloaded = orders.get_order(&m.customer, id).await.unwrap();
    assert_eq!(reloaded.order.status, OrderStatus::Accepted);
    assert_eq!(reloaded.history.unwrap().len(), 2);
}

#[tokio::test]
async fn test_detail_update_without_status_keeps_history() {
    let m = market().await;
    let orders = m.app.services.orders();
    let id = orders
        .create_order(&m.customer, cart(&[(m.tomatoes, 1)]))
        .await
        .unwrap()
        .order
        .id;

    let updated = orders
        .update_order(
            &m.customer,
            id,
            OrderPatch {
                notes: Patch::Value("Leave at the gate".to_string()),
                delivery_time: Patch::Null,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.order.status, OrderStatus::Pending);
    assert_eq!(updated.order.notes.as_deref(), Some("Leave at the gate"));
    assert_eq!(updated.order.delivery_time, None);
    assert_eq!(updated.history.unwrap().len(), 1);
}

#[tokio::test]
async fn test_guarded_decrement_refuses_to_go_negative() {
    let m = market().await;
    let uow = Persistence::new(m.app.db.get_connection());
    let id = m.tomatoes;

    let err = uow
        .transaction(move |ctx| {
            Box::pin(async move { ctx.products().decrement_stock(id, 60).await })
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::InsufficientStock {
            product_id,
            requested: 60,
            available: 50,
        } if product_id == id
    ));
    assert_eq!(m.app.stock_of(id).await, 50);

    // The second decrement sees the first one's effect and the whole
    // transaction rolls back
    let err = uow
        .transaction(move |ctx| {
            Box::pin(async move {
                let products = ctx.products();
                products.decrement_stock(id, 45).await?;
                products.decrement_stock(id, 10).await
            })
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::InsufficientStock {
            requested: 10,
            available: 5,
            ..
        }
    ));
    assert_eq!(m.app.stock_of(id).await, 50);
}
