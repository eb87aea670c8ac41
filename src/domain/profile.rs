//! Role-specific profile side-records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::patch::Patch;
use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FarmerProfile {
    pub id: i32,
    pub user_id: Uuid,
    #[schema(example = "Sunny Acres")]
    pub farm_name: String,
    pub farm_address: String,
    pub farm_description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[schema(example = "USDA Organic")]
    pub certification_type: Option<String>,
    pub years_experience: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CustomerProfile {
    pub id: i32,
    pub user_id: Uuid,
    pub delivery_address: Option<String>,
    #[schema(example = "morning")]
    pub preferred_delivery_time: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile of the calling user, whichever role they hold.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum Profile {
    Farmer(FarmerProfile),
    Customer(CustomerProfile),
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct FarmerProfilePatch {
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "Sunny Acres")]
    pub farm_name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub farm_address: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub farm_description: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub latitude: Patch<f64>,
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub longitude: Patch<f64>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub certification_type: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<i32>)]
    pub years_experience: Patch<i32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FarmerProfileChanges {
    pub farm_name: Option<String>,
    pub farm_address: Option<String>,
    pub farm_description: Option<Option<String>>,
    pub latitude: Option<Option<f64>>,
    pub longitude: Option<Option<f64>>,
    pub certification_type: Option<Option<String>>,
    pub years_experience: Option<Option<i32>>,
}

impl FarmerProfilePatch {
    pub fn into_changes(self) -> AppResult<FarmerProfileChanges> {
        if let Some(lat) = self.latitude.as_value() {
            if !(-90.0..=90.0).contains(lat) {
                return Err(AppError::validation("latitude must be between -90 and 90"));
            }
        }
        if let Some(lng) = self.longitude.as_value() {
            if !(-180.0..=180.0).contains(lng) {
                return Err(AppError::validation("longitude must be between -180 and 180"));
            }
        }
        if let Some(years) = self.years_experience.as_value() {
            if *years < 0 {
                return Err(AppError::validation("years_experience must not be negative"));
            }
        }

        Ok(FarmerProfileChanges {
            farm_name: self.farm_name.into_required("farm_name")?,
            farm_address: self.farm_address.into_required("farm_address")?,
            farm_description: self.farm_description.into_nullable(),
            latitude: self.latitude.into_nullable(),
            longitude: self.longitude.into_nullable(),
            certification_type: self.certification_type.into_nullable(),
            years_experience: self.years_experience.into_nullable(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CustomerProfilePatch {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub delivery_address: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "evening")]
    pub preferred_delivery_time: Patch<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerProfileChanges {
    pub delivery_address: Option<Option<String>>,
    pub preferred_delivery_time: Option<Option<String>>,
}

impl From<CustomerProfilePatch> for CustomerProfileChanges {
    fn from(patch: CustomerProfilePatch) -> Self {
        Self {
            delivery_address: patch.delivery_address.into_nullable(),
            preferred_delivery_time: patch.preferred_delivery_time.into_nullable(),
        }
    }
}
