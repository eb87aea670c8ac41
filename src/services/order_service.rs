//! Order service - placement, reads and status updates.
//!
//! Placement locks the cart's product rows, prices the cart against the
//! locked rows, decrements stock and writes the order graph in a single
//! transaction. Any failure rolls everything back.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Identity, NewOrder, Order, OrderDetails, OrderPatch, PricedCart, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::{OrderScope, UnitOfWork};
use crate::with_transaction;

#[async_trait]
pub trait OrderService: Send + Sync {
    /// Place an order for the calling customer
    async fn create_order(&self, customer: &Identity, data: NewOrder) -> AppResult<OrderDetails>;

    /// Orders visible to the caller, newest first, with their items
    async fn list_orders(&self, identity: &Identity) -> AppResult<Vec<OrderDetails>>;

    /// Full order graph including status history
    async fn get_order(&self, identity: &Identity, id: i32) -> AppResult<OrderDetails>;

    /// Apply a presence-based patch; a status change is logged in the history
    async fn update_order(
        &self,
        actor: &Identity,
        id: i32,
        patch: OrderPatch,
    ) -> AppResult<OrderDetails>;
}

/// Whether `identity` may read `order`.
fn can_view(identity: &Identity, order: &Order) -> bool {
    match identity.role {
        UserRole::Admin => true,
        UserRole::Customer => order.customer_id == identity.id,
        UserRole::Farmer => order.farmer_id == identity.id,
    }
}

/// Whether `identity` may modify `order`. Admins may not.
fn can_modify(identity: &Identity, order: &Order) -> bool {
    identity.role != UserRole::Admin && can_view(identity, order)
}

pub struct OrderEngine<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> OrderEngine<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> OrderService for OrderEngine<U> {
    async fn create_order(&self, customer: &Identity, data: NewOrder) -> AppResult<OrderDetails> {
        customer.require(UserRole::Customer)?;
        if data.items.is_empty() {
            return Err(AppError::EmptyCart);
        }
        if data.delivery_address.trim().is_empty() {
            return Err(AppError::validation("Delivery address is required"));
        }

        let customer_id = customer.id;
        let result = with_transaction!(self.uow, |ctx| {
            let products = ctx.products();
            let ids: Vec<i32> = data.items.iter().map(|line| line.product_id).collect();
            let locked = products.lock_many(&ids).await?;

            let cart = PricedCart::price(&data.items, &locked)?;
            for (product_id, quantity) in cart.stock_deductions() {
                products.decrement_stock(product_id, quantity).await?;
            }

            let orders = ctx.orders();
            let order_id = orders.create(customer_id, &data, &cart).await?;
            orders.details(order_id).await
        });

        match &result {
            Ok(details) => tracing::info!(
                order_id = details.order.id,
                customer_id = %customer_id,
                farmer_id = %details.order.farmer_id,
                total = %details.order.total_amount,
                "order created"
            ),
            Err(e) => tracing::debug!(customer_id = %customer_id, error = %e, "order rejected"),
        }
        result
    }

    async fn list_orders(&self, identity: &Identity) -> AppResult<Vec<OrderDetails>> {
        let scope = match identity.role {
            UserRole::Customer => OrderScope::Customer(identity.id),
            UserRole::Farmer => OrderScope::Farmer(identity.id),
            UserRole::Admin => OrderScope::All,
        };
        self.uow.orders().list(scope).await
    }

    async fn get_order(&self, identity: &Identity, id: i32) -> AppResult<OrderDetails> {
        let details = self
            .uow
            .orders()
            .find_details(id)
            .await?
            .ok_or(AppError::OrderNotFound(id))?;

        if !can_view(identity, &details.order) {
            return Err(AppError::Forbidden);
        }
        Ok(details)
    }

    async fn update_order(
        &self,
        actor: &Identity,
        id: i32,
        patch: OrderPatch,
    ) -> AppResult<OrderDetails> {
        let changes = patch.into_changes()?;
        let new_status = changes.status;
        let actor_id = actor.id;
        let actor = actor.clone();

        let details = with_transaction!(self.uow, |ctx| {
            let orders = ctx.orders();
            let order = orders.lock(id).await?.ok_or(AppError::OrderNotFound(id))?;
            if !can_modify(&actor, &order) {
                return Err(AppError::Forbidden);
            }

            if changes.touches_details() {
                orders.update_details(id, &changes).await?;
            }
            if let Some(status) = changes.status {
                let note = format!("Status updated by {}", actor.role);
                orders.set_status(id, status, Some(note)).await?;
            }
            orders.details(id).await
        })?;

        if let Some(status) = new_status {
            tracing::info!(order_id = id, status = %status, actor = %actor_id, "order status updated");
        }
        Ok(details)
    }
}
