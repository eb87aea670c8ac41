//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and runs multi-table workflows in one
//! database transaction: registration (user plus profile), order placement
//! (stock, order graph, history) and order status changes.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    AccessMode, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbBackend, EntityTrait, IsolationLevel, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::repositories::entities::{
    customer_profile, farmer_profile, order, order_item, order_status_history, product, user,
};
use super::repositories::{
    is_unique_violation, load_details, CategoryRepository, CategoryStore, OrderRepository,
    OrderStore, ProductRepository, ProductStore, ProfileRepository, ProfileStore,
    ReviewRepository, ReviewStore, UserRepository, UserStore,
};
use crate::config::ORDER_CREATED_NOTE;
use crate::domain::{
    NewOrder, Order, OrderChanges, OrderDetails, OrderStatus, PricedCart, Product, User, UserRole,
};
use crate::errors::{AppError, AppResult, OptionExt};

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly because of the generic `transaction` method; tests
/// implement it by hand around mocked repositories.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn profiles(&self) -> Arc<dyn ProfileRepository>;

    fn categories(&self) -> Arc<dyn CategoryRepository>;

    fn products(&self) -> Arc<dyn ProductRepository>;

    fn orders(&self) -> Arc<dyn OrderRepository>;

    fn reviews(&self) -> Arc<dyn ReviewRepository>;

    /// Execute a closure within a transaction.
    ///
    /// Committed when the closure returns `Ok`, rolled back on `Err`.
    /// Runs at ReadCommitted; stock rows are serialized with explicit locks.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
///
/// Everything done through the context shares one transaction. Never touch
/// the connection pool from inside a transaction closure.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn users(&self) -> TxUserRepository<'_> {
        TxUserRepository { txn: self.txn }
    }

    pub fn products(&self) -> TxProductRepository<'_> {
        TxProductRepository { txn: self.txn }
    }

    pub fn orders(&self) -> TxOrderRepository<'_> {
        TxOrderRepository { txn: self.txn }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    profile_repo: Arc<ProfileStore>,
    category_repo: Arc<CategoryStore>,
    product_repo: Arc<ProductStore>,
    order_repo: Arc<OrderStore>,
    review_repo: Arc<ReviewStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            profile_repo: Arc::new(ProfileStore::new(db.clone())),
            category_repo: Arc::new(CategoryStore::new(db.clone())),
            product_repo: Arc::new(ProductStore::new(db.clone())),
            order_repo: Arc::new(OrderStore::new(db.clone())),
            review_repo: Arc::new(ReviewStore::new(db.clone())),
            db,
        }
    }

    async fn begin(&self, isolation: IsolationLevel) -> AppResult<DatabaseTransaction> {
        let txn = match self.db.get_database_backend() {
            // SQLite has a single writer and no isolation levels
            DbBackend::Sqlite => self.db.begin().await?,
            _ => {
                self.db
                    .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
                    .await?
            }
        };
        Ok(txn)
    }

    async fn execute_transaction<F, T>(&self, isolation: IsolationLevel, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self.begin(isolation).await?;
        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn profiles(&self) -> Arc<dyn ProfileRepository> {
        self.profile_repo.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.category_repo.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.product_repo.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.order_repo.clone()
    }

    fn reviews(&self) -> Arc<dyn ReviewRepository> {
        self.review_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::ReadCommitted, f).await
    }
}

/// Fields of a user row to insert
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

/// Transaction-aware user repository.
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxUserRepository<'a> {
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.txn)
            .await?
            .map(User::try_from)
            .transpose()
    }

    /// Insert the user row; a taken email maps to `EmailTaken`.
    pub async fn create(&self, record: NewUserRecord) -> AppResult<User> {
        let now = Utc::now();
        let active_model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(record.email),
            password_hash: Set(record.password_hash),
            role: Set(record.role.into()),
            first_name: Set(record.first_name),
            last_name: Set(record.last_name),
            phone: Set(record.phone),
            is_active: Set(true),
            is_verified: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match active_model.insert(self.txn).await {
            Ok(model) => User::try_from(model),
            Err(e) if is_unique_violation(&e) => Err(AppError::EmailTaken),
            Err(e) => Err(e.into()),
        }
    }

    /// Create the empty role profile for a freshly inserted user.
    ///
    /// Farmers get blank farm name/address placeholders, customers null
    /// preferences. Admins have no profile.
    pub async fn create_profile(&self, user: &User) -> AppResult<()> {
        let now = Utc::now();
        match user.role {
            UserRole::Farmer => {
                farmer_profile::ActiveModel {
                    user_id: Set(user.id),
                    farm_name: Set(String::new()),
                    farm_address: Set(String::new()),
                    farm_description: Set(None),
                    latitude: Set(None),
                    longitude: Set(None),
                    certification_type: Set(None),
                    years_experience: Set(None),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(self.txn)
                .await?;
            }
            UserRole::Customer => {
                customer_profile::ActiveModel {
                    user_id: Set(user.id),
                    delivery_address: Set(None),
                    preferred_delivery_time: Set(None),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(self.txn)
                .await?;
            }
            UserRole::Admin => {}
        }
        Ok(())
    }
}

/// Transaction-aware product repository for stock handling.
pub struct TxProductRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxProductRepository<'a> {
    /// Lock the product rows for `ids` in ascending id order and return them.
    ///
    /// Unknown ids are simply absent from the map. On Postgres this is
    /// `SELECT ... FOR UPDATE`; concurrent buyers of the same product queue
    /// here, and the fixed lock order keeps them from deadlocking.
    pub async fn lock_many(&self, ids: &[i32]) -> AppResult<HashMap<i32, Product>> {
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let models = product::Entity::find()
            .filter(product::Column::Id.is_in(ids))
            .order_by_asc(product::Column::Id)
            .lock_exclusive()
            .all(self.txn)
            .await?;

        models
            .into_iter()
            .map(|model| Product::try_from(model).map(|p| (p.id, p)))
            .collect()
    }

    /// Guarded decrement: never takes stock below zero.
    pub async fn decrement_stock(&self, product_id: i32, quantity: i32) -> AppResult<()> {
        let result = product::Entity::update_many()
            .col_expr(
                product::Column::QuantityAvailable,
                Expr::col(product::Column::QuantityAvailable).sub(quantity),
            )
            .col_expr(product::Column::UpdatedAt, Expr::value(Utc::now()).into())
            .filter(product::Column::Id.eq(product_id))
            .filter(product::Column::QuantityAvailable.gte(quantity))
            .exec(self.txn)
            .await?;

        if result.rows_affected == 0 {
            let available = product::Entity::find_by_id(product_id)
                .one(self.txn)
                .await?
                .map(|p| p.quantity_available)
                .unwrap_or(0);
            return Err(AppError::InsufficientStock {
                product_id,
                requested: quantity,
                available,
            });
        }
        Ok(())
    }
}

/// Transaction-aware order repository.
///
/// The status header and the history log only change together, through
/// [`TxOrderRepository::create`] and [`TxOrderRepository::set_status`].
pub struct TxOrderRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxOrderRepository<'a> {
    /// Persist a priced cart as a PENDING order with its lines and first
    /// history entry. Returns the new order id.
    pub async fn create(
        &self,
        customer_id: Uuid,
        data: &NewOrder,
        cart: &PricedCart,
    ) -> AppResult<i32> {
        let now = Utc::now();
        let header = order::ActiveModel {
            customer_id: Set(customer_id),
            farmer_id: Set(cart.farmer_id),
            status: Set(OrderStatus::Pending.to_string()),
            total_cents: Set(cart.total_amount.cents()?),
            delivery_address: Set(data.delivery_address.clone()),
            delivery_date: Set(data.delivery_date),
            delivery_time: Set(data.delivery_time.clone()),
            notes: Set(data.notes.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.txn)
        .await?;

        for line in &cart.lines {
            order_item::ActiveModel {
                order_id: Set(header.id),
                product_id: Set(line.product_id),
                quantity: Set(line.quantity),
                unit_price_cents: Set(line.unit_price.cents()?),
                total_price_cents: Set(line.total_price.cents()?),
                ..Default::default()
            }
            .insert(self.txn)
            .await?;
        }

        self.append_history(header.id, OrderStatus::Pending, Some(ORDER_CREATED_NOTE.to_string()))
            .await?;

        Ok(header.id)
    }

    /// Load and lock an order header for modification.
    pub async fn lock(&self, id: i32) -> AppResult<Option<Order>> {
        order::Entity::find_by_id(id)
            .lock_exclusive()
            .one(self.txn)
            .await?
            .map(Order::try_from)
            .transpose()
    }

    /// Apply delivery/notes changes. Status is ignored here.
    pub async fn update_details(&self, id: i32, changes: &OrderChanges) -> AppResult<()> {
        let model = order::Entity::find_by_id(id)
            .one(self.txn)
            .await?
            .ok_or(AppError::OrderNotFound(id))?;
        let mut active: order::ActiveModel = model.into();

        if let Some(v) = changes.delivery_date {
            active.delivery_date = Set(v);
        }
        if let Some(v) = &changes.delivery_time {
            active.delivery_time = Set(v.clone());
        }
        if let Some(v) = &changes.notes {
            active.notes = Set(v.clone());
        }
        active.updated_at = Set(Utc::now());

        active.update(self.txn).await?;
        Ok(())
    }

    /// Change the header status and append the matching history row.
    pub async fn set_status(
        &self,
        id: i32,
        status: OrderStatus,
        note: Option<String>,
    ) -> AppResult<()> {
        let model = order::Entity::find_by_id(id)
            .one(self.txn)
            .await?
            .ok_or(AppError::OrderNotFound(id))?;
        let mut active: order::ActiveModel = model.into();
        active.status = Set(status.to_string());
        active.updated_at = Set(Utc::now());
        active.update(self.txn).await?;

        self.append_history(id, status, note).await
    }

    /// Full order graph as seen by this transaction.
    pub async fn details(&self, id: i32) -> AppResult<OrderDetails> {
        load_details(self.txn, id)
            .await?
            .ok_or_not_found("Order")
    }

    async fn append_history(
        &self,
        order_id: i32,
        status: OrderStatus,
        notes: Option<String>,
    ) -> AppResult<()> {
        order_status_history::ActiveModel {
            order_id: Set(order_id),
            status: Set(status.to_string()),
            notes: Set(notes),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.txn)
        .await?;
        Ok(())
    }
}

/// Simpler API for executing transactional operations.
///
/// This helper macro reduces boilerplate when using transactions.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
