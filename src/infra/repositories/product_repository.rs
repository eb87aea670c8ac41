//! Product repository: catalog listing and owner CRUD.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::category::Entity as CategoryEntity;
use super::entities::order_item;
use super::entities::product::{self, ActiveModel, Entity as ProductEntity};
use crate::domain::{Category, NewProduct, Product, ProductChanges, ProductFilter};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Active, in-stock products matching `filter`, each with its category
    async fn list(&self, filter: ProductFilter) -> AppResult<Vec<(Product, Option<Category>)>>;

    /// Every product of a farmer, whatever its state
    async fn list_by_farmer(&self, farmer_id: Uuid) -> AppResult<Vec<Product>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Product>>;

    async fn create(&self, farmer_id: Uuid, data: NewProduct) -> AppResult<Product>;

    async fn update(&self, id: i32, changes: ProductChanges) -> AppResult<Product>;

    /// Hard delete; fails with a conflict while order lines reference it
    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct ProductStore {
    db: DatabaseConnection,
}

/// Case-sensitive substring match on the product name.
///
/// A position lookup instead of `LIKE`: SQLite's `LIKE` folds ASCII case,
/// and `%`/`_` in the needle stay literal.
fn name_contains(backend: DbBackend, needle: &str) -> SimpleExpr {
    let sql = match backend {
        DbBackend::Postgres => r#"strpos("products"."name", ?) > 0"#,
        _ => r#"instr("products"."name", ?) > 0"#,
    };
    Expr::cust_with_values(sql, [needle.to_string()])
}

impl ProductStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn list(&self, filter: ProductFilter) -> AppResult<Vec<(Product, Option<Category>)>> {
        let mut query = ProductEntity::find()
            .filter(product::Column::IsActive.eq(true))
            .filter(product::Column::QuantityAvailable.gt(0));

        if let Some(category_id) = filter.category_id {
            query = query.filter(product::Column::CategoryId.eq(category_id));
        }
        if let Some(farmer_id) = filter.farmer_id {
            query = query.filter(product::Column::FarmerId.eq(farmer_id));
        }
        if let Some(is_organic) = filter.is_organic {
            query = query.filter(product::Column::IsOrganic.eq(is_organic));
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(name_contains(self.db.get_database_backend(), search));
        }

        let rows = query
            .find_also_related(CategoryEntity)
            .order_by_asc(product::Column::Id)
            .offset(filter.skip)
            .limit(filter.clamped_limit())
            .all(&self.db)
            .await?;

        rows.into_iter()
            .map(|(p, c)| -> AppResult<_> {
                Ok((Product::try_from(p)?, c.map(Category::from)))
            })
            .collect()
    }

    async fn list_by_farmer(&self, farmer_id: Uuid) -> AppResult<Vec<Product>> {
        ProductEntity::find()
            .filter(product::Column::FarmerId.eq(farmer_id))
            .order_by_asc(product::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Product::try_from)
            .collect()
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Product>> {
        ProductEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Product::try_from)
            .transpose()
    }

    async fn create(&self, farmer_id: Uuid, data: NewProduct) -> AppResult<Product> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            farmer_id: Set(farmer_id),
            category_id: Set(data.category_id),
            name: Set(data.name),
            description: Set(data.description),
            price_cents: Set(data.price_per_unit.cents()?),
            unit_type: Set(data.unit_type),
            quantity_available: Set(data.quantity_available),
            min_order_quantity: Set(data.min_order_quantity),
            is_organic: Set(data.is_organic),
            is_active: Set(true),
            harvest_date: Set(data.harvest_date),
            expiry_date: Set(data.expiry_date),
            image_urls: Set(serde_json::Value::from(data.image_urls)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        Product::try_from(active_model.insert(&self.db).await?)
    }

    async fn update(&self, id: i32, changes: ProductChanges) -> AppResult<Product> {
        let model = ProductEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Product")?;
        let mut active: ActiveModel = model.into();

        if let Some(v) = changes.category_id {
            active.category_id = Set(v);
        }
        if let Some(v) = changes.name {
            active.name = Set(v);
        }
        if let Some(v) = changes.description {
            active.description = Set(v);
        }
        if let Some(v) = changes.price_per_unit {
            active.price_cents = Set(v.cents()?);
        }
        if let Some(v) = changes.unit_type {
            active.unit_type = Set(v);
        }
        if let Some(v) = changes.quantity_available {
            active.quantity_available = Set(v);
        }
        if let Some(v) = changes.min_order_quantity {
            active.min_order_quantity = Set(v);
        }
        if let Some(v) = changes.is_organic {
            active.is_organic = Set(v);
        }
        if let Some(v) = changes.is_active {
            active.is_active = Set(v);
        }
        if let Some(v) = changes.harvest_date {
            active.harvest_date = Set(v);
        }
        if let Some(v) = changes.expiry_date {
            active.expiry_date = Set(v);
        }
        if let Some(v) = changes.image_urls {
            active.image_urls = Set(serde_json::Value::from(v));
        }
        active.updated_at = Set(chrono::Utc::now());

        Product::try_from(active.update(&self.db).await?)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let referenced = order_item::Entity::find()
            .filter(order_item::Column::ProductId.eq(id))
            .count(&self.db)
            .await?;
        if referenced > 0 {
            return Err(AppError::conflict("Product is referenced by existing orders"));
        }

        let result = ProductEntity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::not_found("Product"));
        }
        Ok(())
    }
}
