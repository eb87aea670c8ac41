//! Catalog service - categories and farmer-owned products.
//!
//! Role gates run in the HTTP layer; ownership of a product is checked here.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{
    Category, Identity, NewCategory, NewProduct, Product, ProductFilter, ProductPatch,
    ProductResponse, UserResponse,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Active categories in name order
    async fn list_categories(&self) -> AppResult<Vec<Category>>;

    async fn create_category(&self, data: NewCategory) -> AppResult<Category>;

    /// Public listing; each product embeds its category
    async fn list_products(&self, filter: ProductFilter) -> AppResult<Vec<ProductResponse>>;

    /// Product with its owning farmer and category
    async fn get_product(&self, id: i32) -> AppResult<ProductResponse>;

    async fn create_product(&self, farmer: &Identity, data: NewProduct) -> AppResult<ProductResponse>;

    async fn update_product(
        &self,
        farmer: &Identity,
        id: i32,
        patch: ProductPatch,
    ) -> AppResult<ProductResponse>;

    async fn delete_product(&self, farmer: &Identity, id: i32) -> AppResult<()>;

    /// Every product of the farmer, including inactive and sold-out ones
    async fn farmer_products(&self, farmer: &Identity) -> AppResult<Vec<ProductResponse>>;
}

pub struct Catalog<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> Catalog<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn ensure_category(&self, id: i32) -> AppResult<Category> {
        self.uow
            .categories()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Category")
    }

    /// Load a product and check the caller owns it.
    async fn owned_product(&self, farmer: &Identity, id: i32) -> AppResult<Product> {
        let product = self
            .uow
            .products()
            .find_by_id(id)
            .await?
            .ok_or(AppError::ProductNotFound(id))?;

        if product.farmer_id != farmer.id {
            return Err(AppError::Forbidden);
        }
        Ok(product)
    }
}

#[async_trait]
impl<U: UnitOfWork> CatalogService for Catalog<U> {
    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.uow.categories().list_active().await
    }

    async fn create_category(&self, data: NewCategory) -> AppResult<Category> {
        let category = self.uow.categories().create(data).await?;
        tracing::info!(category_id = category.id, name = %category.name, "category created");
        Ok(category)
    }

    async fn list_products(&self, filter: ProductFilter) -> AppResult<Vec<ProductResponse>> {
        let rows = self.uow.products().list(filter).await?;
        Ok(rows
            .into_iter()
            .map(|(product, category)| ProductResponse::from(product).with_category(category))
            .collect())
    }

    async fn get_product(&self, id: i32) -> AppResult<ProductResponse> {
        let product = self
            .uow
            .products()
            .find_by_id(id)
            .await?
            .ok_or(AppError::ProductNotFound(id))?;

        let farmer = self.uow.users().find_by_id(product.farmer_id).await?;
        let category = self.uow.categories().find_by_id(product.category_id).await?;

        Ok(ProductResponse::from(product)
            .with_category(category)
            .with_farmer(farmer.map(UserResponse::from)))
    }

    async fn create_product(&self, farmer: &Identity, data: NewProduct) -> AppResult<ProductResponse> {
        let category = self.ensure_category(data.category_id).await?;
        let product = self.uow.products().create(farmer.id, data).await?;

        tracing::info!(product_id = product.id, farmer_id = %farmer.id, "product created");
        Ok(ProductResponse::from(product).with_category(Some(category)))
    }

    async fn update_product(
        &self,
        farmer: &Identity,
        id: i32,
        patch: ProductPatch,
    ) -> AppResult<ProductResponse> {
        self.owned_product(farmer, id).await?;
        let changes = patch.into_changes()?;
        if let Some(category_id) = changes.category_id {
            self.ensure_category(category_id).await?;
        }

        let product = self.uow.products().update(id, changes).await?;
        Ok(ProductResponse::from(product))
    }

    async fn delete_product(&self, farmer: &Identity, id: i32) -> AppResult<()> {
        self.owned_product(farmer, id).await?;
        self.uow.products().delete(id).await?;
        tracing::info!(product_id = id, farmer_id = %farmer.id, "product deleted");
        Ok(())
    }

    async fn farmer_products(&self, farmer: &Identity) -> AppResult<Vec<ProductResponse>> {
        let products = self.uow.products().list_by_farmer(farmer.id).await?;
        Ok(products.into_iter().map(ProductResponse::from).collect())
    }
}
