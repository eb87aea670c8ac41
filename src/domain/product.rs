//! Product catalog entity.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::category::Category;
use super::money::Money;
use super::patch::Patch;
use super::user::UserResponse;
use crate::config::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, MIN_PAGE_LIMIT};
use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i32,
    pub farmer_id: Uuid,
    pub category_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price_per_unit: Money,
    pub unit_type: String,
    pub quantity_available: i32,
    pub min_order_quantity: i32,
    pub is_organic: bool,
    pub is_active: bool,
    pub harvest_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Listed and orderable: active with stock on hand.
    pub fn is_available(&self) -> bool {
        self.is_active && self.quantity_available > 0
    }
}

/// Product creation payload (farmer only)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewProduct {
    #[schema(example = 1)]
    pub category_id: i32,
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    #[schema(example = "Heirloom Tomatoes")]
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "4.99")]
    pub price_per_unit: Money,
    #[validate(length(min = 1, max = 50, message = "Unit type must be 1-50 characters"))]
    #[schema(example = "kg")]
    pub unit_type: String,
    #[validate(range(min = 0, message = "Quantity must not be negative"))]
    #[schema(example = 50)]
    pub quantity_available: i32,
    #[serde(default = "default_min_order")]
    #[validate(range(min = 1, message = "Minimum order quantity must be at least 1"))]
    pub min_order_quantity: i32,
    #[serde(default)]
    pub is_organic: bool,
    pub harvest_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

fn default_min_order() -> i32 {
    1
}

/// Presence-based product update
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ProductPatch {
    #[serde(default)]
    #[schema(value_type = Option<i32>)]
    pub category_id: Patch<i32>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub description: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "5.49")]
    pub price_per_unit: Patch<Money>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub unit_type: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<i32>)]
    pub quantity_available: Patch<i32>,
    #[serde(default)]
    #[schema(value_type = Option<i32>)]
    pub min_order_quantity: Patch<i32>,
    #[serde(default)]
    #[schema(value_type = Option<bool>)]
    pub is_organic: Patch<bool>,
    #[serde(default)]
    #[schema(value_type = Option<bool>)]
    pub is_active: Patch<bool>,
    #[serde(default)]
    #[schema(value_type = Option<NaiveDate>)]
    pub harvest_date: Patch<NaiveDate>,
    #[serde(default)]
    #[schema(value_type = Option<NaiveDate>)]
    pub expiry_date: Patch<NaiveDate>,
    #[serde(default)]
    #[schema(value_type = Option<Vec<String>>)]
    pub image_urls: Patch<Vec<String>>,
}

/// Column-level changes resolved from a [`ProductPatch`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub category_id: Option<i32>,
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub price_per_unit: Option<Money>,
    pub unit_type: Option<String>,
    pub quantity_available: Option<i32>,
    pub min_order_quantity: Option<i32>,
    pub is_organic: Option<bool>,
    pub is_active: Option<bool>,
    pub harvest_date: Option<Option<NaiveDate>>,
    pub expiry_date: Option<Option<NaiveDate>>,
    pub image_urls: Option<Vec<String>>,
}

impl ProductPatch {
    pub fn into_changes(self) -> AppResult<ProductChanges> {
        let changes = ProductChanges {
            category_id: self.category_id.into_required("category_id")?,
            name: self.name.into_required("name")?,
            description: self.description.into_nullable(),
            price_per_unit: self.price_per_unit.into_required("price_per_unit")?,
            unit_type: self.unit_type.into_required("unit_type")?,
            quantity_available: self.quantity_available.into_required("quantity_available")?,
            min_order_quantity: self.min_order_quantity.into_required("min_order_quantity")?,
            is_organic: self.is_organic.into_required("is_organic")?,
            is_active: self.is_active.into_required("is_active")?,
            harvest_date: self.harvest_date.into_nullable(),
            expiry_date: self.expiry_date.into_nullable(),
            // null clears the gallery
            image_urls: self.image_urls.into_nullable().map(Option::unwrap_or_default),
        };

        if matches!(&changes.name, Some(name) if name.trim().is_empty()) {
            return Err(AppError::validation("Name must not be empty"));
        }
        if matches!(&changes.unit_type, Some(unit) if unit.trim().is_empty()) {
            return Err(AppError::validation("Unit type must not be empty"));
        }
        if matches!(changes.quantity_available, Some(q) if q < 0) {
            return Err(AppError::validation("Quantity must not be negative"));
        }
        if matches!(changes.min_order_quantity, Some(m) if m < 1) {
            return Err(AppError::validation(
                "Minimum order quantity must be at least 1",
            ));
        }
        Ok(changes)
    }
}

/// Catalog listing filters. Only active products with stock are listed.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFilter {
    pub category_id: Option<i32>,
    pub farmer_id: Option<Uuid>,
    pub is_organic: Option<bool>,
    /// Case-sensitive substring of the name; wildcards are not interpreted
    pub search: Option<String>,
    pub skip: u64,
    pub limit: u64,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            category_id: None,
            farmer_id: None,
            is_organic: None,
            search: None,
            skip: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl ProductFilter {
    /// Limit clamped into the allowed page window.
    pub fn clamped_limit(&self) -> u64 {
        self.limit.clamp(MIN_PAGE_LIMIT, MAX_PAGE_LIMIT)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductResponse {
    #[schema(example = 1)]
    pub id: i32,
    pub farmer_id: Uuid,
    pub category_id: i32,
    #[schema(example = "Heirloom Tomatoes")]
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "4.99")]
    pub price_per_unit: Money,
    #[schema(example = "kg")]
    pub unit_type: String,
    pub quantity_available: i32,
    pub min_order_quantity: i32,
    pub is_organic: bool,
    pub is_active: bool,
    pub is_available: bool,
    pub harvest_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farmer: Option<UserResponse>,
}

impl ProductResponse {
    pub fn with_category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }

    pub fn with_farmer(mut self, farmer: Option<UserResponse>) -> Self {
        self.farmer = farmer;
        self
    }
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        let is_available = p.is_available();
        Self {
            id: p.id,
            farmer_id: p.farmer_id,
            category_id: p.category_id,
            name: p.name,
            description: p.description,
            price_per_unit: p.price_per_unit,
            unit_type: p.unit_type,
            quantity_available: p.quantity_available,
            min_order_quantity: p.min_order_quantity,
            is_organic: p.is_organic,
            is_active: p.is_active,
            is_available,
            harvest_date: p.harvest_date,
            expiry_date: p.expiry_date,
            image_urls: p.image_urls,
            created_at: p.created_at,
            updated_at: p.updated_at,
            category: None,
            farmer: None,
        }
    }
}
