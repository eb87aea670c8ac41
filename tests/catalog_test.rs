//! Catalog listings, product ownership, seeding and reviews.

mod common;

use common::{new_product, TestApp};
use farm_market::commands::seed::seed_default_categories;
use farm_market::domain::{
    CartLine, NewOrder, NewReview, Patch, ProductFilter, ProductPatch, UserRole,
};
use farm_market::errors::AppError;
use farm_market::infra::Persistence;
use farm_market::services::ServiceContainer;

#[tokio::test]
async fn test_listing_shows_only_active_products_in_stock() {
    let app = TestApp::new().await;
    let farmer = app.register(UserRole::Farmer, "farmer@example.com").await;
    let veg = app.category("Vegetables").await;
    let catalog = app.services.catalog();

    let carrots = app.product(&farmer, veg.id, "Carrots", "1.50", 40).await;
    app.product(&farmer, veg.id, "Sold Out Beets", "2.00", 0).await;
    let hidden = app.product(&farmer, veg.id, "Hidden Kale", "3.00", 10).await;
    catalog
        .update_product(
            &farmer,
            hidden.id,
            ProductPatch {
                is_active: Patch::Value(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let listed = catalog.list_products(ProductFilter::default()).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, carrots.id);
    assert_eq!(listed[0].category.as_ref().map(|c| c.id), Some(veg.id));

    // The farmer's own listing includes everything
    let mine = catalog.farmer_products(&farmer).await.unwrap();
    assert_eq!(mine.len(), 3);
}

#[tokio::test]
async fn test_listing_filters_and_paging() {
    let app = TestApp::new().await;
    let ada = app.register(UserRole::Farmer, "ada@example.com").await;
    let ben = app.register(UserRole::Farmer, "ben@example.com").await;
    let veg = app.category("Vegetables").await;
    let fruit = app.category("Fruits").await;
    let catalog = app.services.catalog();

    app.product(&ada, veg.id, "Cherry Tomatoes", "3.20", 10).await;
    app.product(&ada, fruit.id, "Apples", "1.10", 10).await;
    app.product(&ben, fruit.id, "Tomato Jam Pears", "2.40", 10).await;

    let by_category = catalog
        .list_products(ProductFilter {
            category_id: Some(fruit.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_category.len(), 2);

    let by_farmer = catalog
        .list_products(ProductFilter {
            farmer_id: Some(ben.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_farmer.len(), 1);

    let by_name = catalog
        .list_products(ProductFilter {
            search: Some("Tomato".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_name.len(), 2);

    let page = catalog
        .list_products(ProductFilter {
            skip: 1,
            limit: 1,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].name, "Apples");

    let clamped = catalog
        .list_products(ProductFilter {
            limit: 0,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(clamped.len(), 1);
}

#[tokio::test]
async fn test_search_is_case_sensitive_and_literal() {
    let app = TestApp::new().await;
    let farmer = app.register(UserRole::Farmer, "farmer@example.com").await;
    let veg = app.category("Vegetables").await;
    app.product(&farmer, veg.id, "Heirloom Tomatoes", "4.99", 10).await;
    app.product(&farmer, veg.id, "Snap_Peas 100%", "2.99", 10).await;
    let catalog = app.services.catalog();

    let search = |text: &str| ProductFilter {
        search: Some(text.to_string()),
        ..Default::default()
    };

    assert!(catalog.list_products(search("heirloom")).await.unwrap().is_empty());
    assert_eq!(catalog.list_products(search("Heirloom")).await.unwrap().len(), 1);

    let underscore = catalog.list_products(search("_")).await.unwrap();
    assert_eq!(underscore.len(), 1);
    assert_eq!(underscore[0].name, "Snap_Peas 100%");

    let percent = catalog.list_products(search("%")).await.unwrap();
    assert_eq!(percent.len(), 1);
    assert!(catalog.list_products(search("Tomatoes%")).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_product_detail_embeds_farmer() {
    let app = TestApp::new().await;
    let farmer = app.register(UserRole::Farmer, "farmer@example.com").await;
    let veg = app.category("Vegetables").await;
    let created = app.product(&farmer, veg.id, "Carrots", "1.50", 40).await;

    let detail = app.services.catalog().get_product(created.id).await.unwrap();
    assert_eq!(detail.farmer.as_ref().map(|f| f.id), Some(farmer.id));
    assert_eq!(detail.category.as_ref().map(|c| c.name.as_str()), Some("Vegetables"));

    assert!(matches!(
        app.services.catalog().get_product(created.id + 100).await,
        Err(AppError::ProductNotFound(_))
    ));
}

#[tokio::test]
async fn test_product_requires_known_category() {
    let app = TestApp::new().await;
    let farmer = app.register(UserRole::Farmer, "farmer@example.com").await;

    let err = app
        .services
        .catalog()
        .create_product(&farmer, new_product(42, "Carrots", "1.50", 40))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_only_the_owner_changes_a_product() {
    let app = TestApp::new().await;
    let owner = app.register(UserRole::Farmer, "owner@example.com").await;
    let rival = app.register(UserRole::Farmer, "rival@example.com").await;
    let veg = app.category("Vegetables").await;
    let product = app.product(&owner, veg.id, "Carrots", "1.50", 40).await;
    let catalog = app.services.catalog();

    let rename = || ProductPatch {
        name: Patch::Value("Purple Carrots".to_string()),
        ..Default::default()
    };

    assert!(matches!(
        catalog.update_product(&rival, product.id, rename()).await,
        Err(AppError::Forbidden)
    ));
    assert!(matches!(
        catalog.delete_product(&rival, product.id).await,
        Err(AppError::Forbidden)
    ));

    let updated = catalog.update_product(&owner, product.id, rename()).await.unwrap();
    assert_eq!(updated.name, "Purple Carrots");
    assert_eq!(updated.price_per_unit, product.price_per_unit);
}

#[tokio::test]
async fn test_ordered_product_cannot_be_deleted() {
    let app = TestApp::new().await;
    let farmer = app.register(UserRole::Farmer, "farmer@example.com").await;
    let customer = app.register(UserRole::Customer, "customer@example.com").await;
    let veg = app.category("Vegetables").await;
    let ordered = app.product(&farmer, veg.id, "Carrots", "1.50", 40).await;
    let spare = app.product(&farmer, veg.id, "Parsnips", "1.80", 40).await;

    app.services
        .orders()
        .create_order(
            &customer,
            NewOrder {
                items: vec![CartLine {
                    product_id: ordered.id,
                    quantity: 2,
                }],
                delivery_address: "1 Mill Lane".to_string(),
                delivery_date: None,
                delivery_time: None,
                notes: None,
            },
        )
        .await
        .unwrap();

    let catalog = app.services.catalog();
    assert!(matches!(
        catalog.delete_product(&farmer, ordered.id).await,
        Err(AppError::Conflict(_))
    ));
    catalog.delete_product(&farmer, spare.id).await.unwrap();
    assert!(matches!(
        catalog.get_product(spare.id).await,
        Err(AppError::ProductNotFound(_))
    ));
}

#[tokio::test]
async fn test_default_categories_seed_once() {
    let app = TestApp::new().await;
    let uow = Persistence::new(app.db.get_connection());

    assert_eq!(seed_default_categories(&uow).await.unwrap(), 8);
    assert_eq!(seed_default_categories(&uow).await.unwrap(), 0);

    let categories = app.services.catalog().list_categories().await.unwrap();
    assert_eq!(categories.len(), 8);
    assert!(categories.iter().any(|c| c.name == "Vegetables"));
}

#[tokio::test]
async fn test_reviews_between_order_parties() {
    let app = TestApp::new().await;
    let farmer = app.register(UserRole::Farmer, "farmer@example.com").await;
    let customer = app.register(UserRole::Customer, "customer@example.com").await;
    let stranger = app.register(UserRole::Customer, "stranger@example.com").await;
    let veg = app.category("Vegetables").await;
    let product = app.product(&farmer, veg.id, "Carrots", "1.50", 40).await;

    let order = app
        .services
        .orders()
        .create_order(
            &customer,
            NewOrder {
                items: vec![CartLine {
                    product_id: product.id,
                    quantity: 1,
                }],
                delivery_address: "1 Mill Lane".to_string(),
                delivery_date: None,
                delivery_time: None,
                notes: None,
            },
        )
        .await
        .unwrap();

    let reviews = app.services.reviews();
    let review = |rating| NewReview {
        order_id: order.order.id,
        rating,
        comment: Some("Sweet and crunchy".to_string()),
    };

    let created = reviews.create_review(&customer, review(5)).await.unwrap();
    assert_eq!(created.reviewer_id, customer.id);
    assert_eq!(created.reviewed_id, farmer.id);

    assert!(matches!(
        reviews.create_review(&stranger, review(1)).await,
        Err(AppError::Forbidden)
    ));
    assert!(matches!(
        reviews.create_review(&customer, review(4)).await,
        Err(AppError::Conflict(_))
    ));

    let received = reviews.reviews_for(farmer.id).await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].rating, 5);
}
