//! Order header entity.

use sea_orm::entity::prelude::*;

use crate::domain::{Money, Order, OrderStatus};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub customer_id: Uuid,
    pub farmer_id: Uuid,
    pub status: String,
    pub total_cents: i64,
    pub delivery_address: String,
    pub delivery_date: Option<Date>,
    pub delivery_time: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItem,
    #[sea_orm(has_many = "super::order_status_history::Entity")]
    StatusHistory,
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItem.def()
    }
}

impl Related<super::order_status_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StatusHistory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Order {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Order {
            id: model.id,
            customer_id: model.customer_id,
            farmer_id: model.farmer_id,
            status: model.status.parse::<OrderStatus>()?,
            total_amount: Money::from_cents(model.total_cents),
            delivery_address: model.delivery_address,
            delivery_date: model.delivery_date,
            delivery_time: model.delivery_time,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
