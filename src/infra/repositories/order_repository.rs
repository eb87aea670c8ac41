//! Order read-side repository. Writes go through the unit of work.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::entities::{order, order_item, order_status_history};
use crate::domain::{Order, OrderDetails, OrderItem, OrderStatusHistory};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Which orders a caller may list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderScope {
    Customer(Uuid),
    Farmer(Uuid),
    All,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Orders in scope, newest first, each with its items
    async fn list(&self, scope: OrderScope) -> AppResult<Vec<OrderDetails>>;

    /// Order with items and status history
    async fn find_details(&self, id: i32) -> AppResult<Option<OrderDetails>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Order>>;
}

pub struct OrderStore {
    db: DatabaseConnection,
}

impl OrderStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Load an order graph on any connection or transaction.
pub(crate) async fn load_details<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> AppResult<Option<OrderDetails>> {
    let Some(model) = order::Entity::find_by_id(id).one(conn).await? else {
        return Ok(None);
    };

    let items = order_item::Entity::find()
        .filter(order_item::Column::OrderId.eq(id))
        .order_by_asc(order_item::Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(OrderItem::from)
        .collect();

    let history = order_status_history::Entity::find()
        .filter(order_status_history::Column::OrderId.eq(id))
        .order_by_asc(order_status_history::Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(OrderStatusHistory::try_from)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(Some(OrderDetails {
        order: Order::try_from(model)?,
        items,
        history: Some(history),
    }))
}

#[async_trait]
impl OrderRepository for OrderStore {
    async fn list(&self, scope: OrderScope) -> AppResult<Vec<OrderDetails>> {
        let mut query = order::Entity::find();
        match scope {
            OrderScope::Customer(id) => query = query.filter(order::Column::CustomerId.eq(id)),
            OrderScope::Farmer(id) => query = query.filter(order::Column::FarmerId.eq(id)),
            OrderScope::All => {}
        }

        let rows = query
            .order_by_desc(order::Column::CreatedAt)
            .order_by_desc(order::Column::Id)
            .find_with_related(order_item::Entity)
            .all(&self.db)
            .await?;

        rows.into_iter()
            .map(|(model, mut items)| -> AppResult<OrderDetails> {
                items.sort_by_key(|item| item.id);
                Ok(OrderDetails {
                    order: Order::try_from(model)?,
                    items: items.into_iter().map(OrderItem::from).collect(),
                    history: None,
                })
            })
            .collect()
    }

    async fn find_details(&self, id: i32) -> AppResult<Option<OrderDetails>> {
        load_details(&self.db, id).await
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Order>> {
        order::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Order::try_from)
            .transpose()
    }
}
