//! Orders, line items, status history and cart pricing.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::money::Money;
use super::patch::Patch;
use super::product::Product;
use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Accepted,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Accepted => "accepted",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "accepted" => Ok(OrderStatus::Accepted),
            "preparing" => Ok(OrderStatus::Preparing),
            "ready" => Ok(OrderStatus::Ready),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(AppError::internal(format!("Unknown order status: {}", other))),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order header
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i32,
    pub customer_id: Uuid,
    pub farmer_id: Uuid,
    pub status: OrderStatus,
    pub total_amount: Money,
    pub delivery_address: String,
    pub delivery_date: Option<NaiveDate>,
    pub delivery_time: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Whether `user_id` is the customer or the farmer of this order.
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.customer_id == user_id || self.farmer_id == user_id
    }

    /// The party on the other side of the order from `user_id`.
    pub fn counterparty(&self, user_id: Uuid) -> Option<Uuid> {
        if user_id == self.customer_id {
            Some(self.farmer_id)
        } else if user_id == self.farmer_id {
            Some(self.customer_id)
        } else {
            None
        }
    }
}

/// Order line; prices are snapshotted at creation and never change.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    #[schema(value_type = String, example = "4.99")]
    pub unit_price: Money,
    #[schema(value_type = String, example = "24.95")]
    pub total_price: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrderStatusHistory {
    pub id: i32,
    pub order_id: i32,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Order header with its lines and, when loaded, its status history.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDetails {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub history: Option<Vec<OrderStatusHistory>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
pub struct CartLine {
    #[schema(example = 1)]
    pub product_id: i32,
    #[schema(example = 5)]
    pub quantity: i32,
}

/// Order placement payload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewOrder {
    pub items: Vec<CartLine>,
    #[validate(length(min = 1, message = "Delivery address is required"))]
    #[schema(example = "12 Orchard Rd, Springfield")]
    pub delivery_address: String,
    pub delivery_date: Option<NaiveDate>,
    #[validate(length(max = 50))]
    #[schema(example = "morning")]
    pub delivery_time: Option<String>,
    pub notes: Option<String>,
}

/// Presence-based order update. A present `status` also appends history.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct OrderPatch {
    #[serde(default)]
    #[schema(value_type = Option<OrderStatus>)]
    pub status: Patch<OrderStatus>,
    #[serde(default)]
    #[schema(value_type = Option<NaiveDate>)]
    pub delivery_date: Patch<NaiveDate>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub delivery_time: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub notes: Patch<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderChanges {
    pub status: Option<OrderStatus>,
    pub delivery_date: Option<Option<NaiveDate>>,
    pub delivery_time: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

impl OrderChanges {
    pub fn touches_details(&self) -> bool {
        self.delivery_date.is_some() || self.delivery_time.is_some() || self.notes.is_some()
    }
}

impl OrderPatch {
    pub fn into_changes(self) -> AppResult<OrderChanges> {
        Ok(OrderChanges {
            status: self.status.into_required("status")?,
            delivery_date: self.delivery_date.into_nullable(),
            delivery_time: self.delivery_time.into_nullable(),
            notes: self.notes.into_nullable(),
        })
    }
}

/// One priced cart line ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: Money,
    pub total_price: Money,
}

/// A validated cart: single farmer, snapshotted prices, computed total.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedCart {
    pub farmer_id: Uuid,
    pub lines: Vec<PricedLine>,
    pub total_amount: Money,
}

impl PricedCart {
    /// Validate `lines` in order against `products` and price them.
    ///
    /// Stops at the first violated rule. Repeated lines for the same product
    /// draw down the same stock.
    pub fn price(lines: &[CartLine], products: &HashMap<i32, Product>) -> AppResult<Self> {
        if lines.is_empty() {
            return Err(AppError::EmptyCart);
        }

        let mut remaining: HashMap<i32, i32> = HashMap::new();
        let mut farmer_id: Option<Uuid> = None;
        let mut priced = Vec::with_capacity(lines.len());

        for line in lines {
            let product = products
                .get(&line.product_id)
                .ok_or(AppError::ProductNotFound(line.product_id))?;

            if !product.is_available() {
                return Err(AppError::ProductUnavailable(product.id));
            }

            let available = remaining
                .entry(product.id)
                .or_insert(product.quantity_available);
            if line.quantity > *available {
                return Err(AppError::InsufficientStock {
                    product_id: product.id,
                    requested: line.quantity,
                    available: *available,
                });
            }

            if line.quantity < product.min_order_quantity {
                return Err(AppError::BelowMinimumOrder {
                    product_id: product.id,
                    min: product.min_order_quantity,
                });
            }

            match farmer_id {
                None => farmer_id = Some(product.farmer_id),
                Some(first) if first != product.farmer_id => {
                    return Err(AppError::MixedFarmerOrder)
                }
                Some(_) => {}
            }

            *available -= line.quantity;
            priced.push(PricedLine {
                product_id: product.id,
                quantity: line.quantity,
                unit_price: product.price_per_unit,
                total_price: product.price_per_unit.times(line.quantity)?,
            });
        }

        let total_amount = priced
            .iter()
            .try_fold(Money::ZERO, |acc, line| acc.checked_add(line.total_price))?;

        Ok(Self {
            farmer_id: farmer_id.ok_or(AppError::EmptyCart)?,
            lines: priced,
            total_amount,
        })
    }

    /// Total quantity to take from each product's stock.
    pub fn stock_deductions(&self) -> Vec<(i32, i32)> {
        let mut totals: Vec<(i32, i32)> = Vec::new();
        for line in &self.lines {
            match totals.iter_mut().find(|(id, _)| *id == line.product_id) {
                Some((_, qty)) => *qty += line.quantity,
                None => totals.push((line.product_id, line.quantity)),
            }
        }
        totals.sort_by_key(|(id, _)| *id);
        totals
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderResponse {
    #[schema(example = 1)]
    pub id: i32,
    pub customer_id: Uuid,
    pub farmer_id: Uuid,
    pub status: OrderStatus,
    #[schema(value_type = String, example = "29.93")]
    pub total_amount: Money,
    pub delivery_address: String,
    pub delivery_date: Option<NaiveDate>,
    pub delivery_time: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_history: Option<Vec<OrderStatusHistory>>,
}

impl From<OrderDetails> for OrderResponse {
    fn from(details: OrderDetails) -> Self {
        let OrderDetails {
            order,
            items,
            history,
        } = details;
        Self {
            id: order.id,
            customer_id: order.customer_id,
            farmer_id: order.farmer_id,
            status: order.status,
            total_amount: order.total_amount,
            delivery_address: order.delivery_address,
            delivery_date: order.delivery_date,
            delivery_time: order.delivery_time,
            notes: order.notes,
            created_at: order.created_at,
            updated_at: order.updated_at,
            items,
            status_history: history,
        }
    }
}
