//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{User, UserRole};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::farmer_profile::Entity")]
    FarmerProfile,
    #[sea_orm(has_one = "super::customer_profile::Entity")]
    CustomerProfile,
}

impl Related<super::farmer_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FarmerProfile.def()
    }
}

impl Related<super::customer_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomerProfile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl TryFrom<Model> for User {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(User {
            id: model.id,
            email: model.email,
            password_hash: model.password_hash,
            role: model.role.parse::<UserRole>()?,
            first_name: model.first_name,
            last_name: model.last_name,
            phone: model.phone,
            is_active: model.is_active,
            is_verified: model.is_verified,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
