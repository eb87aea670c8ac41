//! Farmer profile entity.

use sea_orm::entity::prelude::*;

use crate::domain::FarmerProfile;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "farmer_profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub farm_name: String,
    pub farm_address: String,
    pub farm_description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub certification_type: Option<String>,
    pub years_experience: Option<i32>,
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

impl From<Model> for FarmerProfile {
    fn from(model: Model) -> Self {
        FarmerProfile {
            id: model.id,
            user_id: model.user_id,
            farm_name: model.farm_name,
            farm_address: model.farm_address,
            farm_description: model.farm_description,
            latitude: model.latitude,
            longitude: model.longitude,
            certification_type: model.certification_type,
            years_experience: model.years_experience,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
