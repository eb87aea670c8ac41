//! Product entity. Prices are stored in integer cents.

use sea_orm::entity::prelude::*;

use crate::domain::{Money, Product};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub farmer_id: Uuid,
    pub category_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub unit_type: String,
    pub quantity_available: i32,
    pub min_order_quantity: i32,
    pub is_organic: bool,
    pub is_active: bool,
    pub harvest_date: Option<Date>,
    pub expiry_date: Option<Date>,
    pub image_urls: Json,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::FarmerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Farmer,
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItem,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Farmer.def()
    }
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Product {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let image_urls = serde_json::from_value(model.image_urls).map_err(|e| {
            AppError::internal(format!("Malformed image_urls on product {}: {}", model.id, e))
        })?;

        Ok(Product {
            id: model.id,
            farmer_id: model.farmer_id,
            category_id: model.category_id,
            name: model.name,
            description: model.description,
            price_per_unit: Money::from_cents(model.price_cents),
            unit_type: model.unit_type,
            quantity_available: model.quantity_available,
            min_order_quantity: model.min_order_quantity,
            is_organic: model.is_organic,
            is_active: model.is_active,
            harvest_date: model.harvest_date,
            expiry_date: model.expiry_date,
            image_urls,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
