//! Farmer and customer profile repository.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::entities::{customer_profile, farmer_profile};
use crate::domain::{CustomerProfile, CustomerProfileChanges, FarmerProfile, FarmerProfileChanges};
use crate::errors::{AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn farmer_profile(&self, user_id: Uuid) -> AppResult<Option<FarmerProfile>>;

    async fn customer_profile(&self, user_id: Uuid) -> AppResult<Option<CustomerProfile>>;

    async fn update_farmer_profile(
        &self,
        user_id: Uuid,
        changes: FarmerProfileChanges,
    ) -> AppResult<FarmerProfile>;

    async fn update_customer_profile(
        &self,
        user_id: Uuid,
        changes: CustomerProfileChanges,
    ) -> AppResult<CustomerProfile>;
}

pub struct ProfileStore {
    db: DatabaseConnection,
}

impl ProfileStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn farmer_model(&self, user_id: Uuid) -> AppResult<Option<farmer_profile::Model>> {
        Ok(farmer_profile::Entity::find()
            .filter(farmer_profile::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?)
    }

    async fn customer_model(&self, user_id: Uuid) -> AppResult<Option<customer_profile::Model>> {
        Ok(customer_profile::Entity::find()
            .filter(customer_profile::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?)
    }
}

#[async_trait]
impl ProfileRepository for ProfileStore {
    async fn farmer_profile(&self, user_id: Uuid) -> AppResult<Option<FarmerProfile>> {
        Ok(self.farmer_model(user_id).await?.map(FarmerProfile::from))
    }

    async fn customer_profile(&self, user_id: Uuid) -> AppResult<Option<CustomerProfile>> {
        Ok(self.customer_model(user_id).await?.map(CustomerProfile::from))
    }

    async fn update_farmer_profile(
        &self,
        user_id: Uuid,
        changes: FarmerProfileChanges,
    ) -> AppResult<FarmerProfile> {
        let model = self
            .farmer_model(user_id)
            .await?
            .ok_or_not_found("Farmer profile")?;
        let mut active: farmer_profile::ActiveModel = model.into();

        if let Some(v) = changes.farm_name {
            active.farm_name = Set(v);
        }
        if let Some(v) = changes.farm_address {
            active.farm_address = Set(v);
        }
        if let Some(v) = changes.farm_description {
            active.farm_description = Set(v);
        }
        if let Some(v) = changes.latitude {
            active.latitude = Set(v);
        }
        if let Some(v) = changes.longitude {
            active.longitude = Set(v);
        }
        if let Some(v) = changes.certification_type {
            active.certification_type = Set(v);
        }
        if let Some(v) = changes.years_experience {
            active.years_experience = Set(v);
        }
        active.updated_at = Set(chrono::Utc::now());

        Ok(active.update(&self.db).await?.into())
    }

    async fn update_customer_profile(
        &self,
        user_id: Uuid,
        changes: CustomerProfileChanges,
    ) -> AppResult<CustomerProfile> {
        let model = self
            .customer_model(user_id)
            .await?
            .ok_or_not_found("Customer profile")?;
        let mut active: customer_profile::ActiveModel = model.into();

        if let Some(v) = changes.delivery_address {
            active.delivery_address = Set(v);
        }
        if let Some(v) = changes.preferred_delivery_time {
            active.preferred_delivery_time = Set(v);
        }
        active.updated_at = Set(chrono::Utc::now());

        Ok(active.update(&self.db).await?.into())
    }
}
