//! Customer profile entity.

use sea_orm::entity::prelude::*;

use crate::domain::CustomerProfile;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "customer_profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub delivery_address: Option<String>,
    pub preferred_delivery_time: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for CustomerProfile {
    fn from(model: Model) -> Self {
        CustomerProfile {
            id: model.id,
            user_id: model.user_id,
            delivery_address: model.delivery_address,
            preferred_delivery_time: model.preferred_delivery_time,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
