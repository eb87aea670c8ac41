//! User service - own account, role profiles and admin activation.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    CustomerProfile, CustomerProfilePatch, FarmerProfile, FarmerProfilePatch, Identity, Profile,
    User, UserPatch, UserRole,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Apply a presence-based patch to the caller's own record
    async fn update_user(&self, id: Uuid, patch: UserPatch) -> AppResult<User>;

    /// Role profile of the caller; admins have none
    async fn profile(&self, identity: &Identity) -> AppResult<Profile>;

    async fn update_farmer_profile(
        &self,
        identity: &Identity,
        patch: FarmerProfilePatch,
    ) -> AppResult<FarmerProfile>;

    async fn update_customer_profile(
        &self,
        identity: &Identity,
        patch: CustomerProfilePatch,
    ) -> AppResult<CustomerProfile>;

    /// Activate or deactivate an account (admin only)
    async fn set_active(&self, id: Uuid, is_active: bool) -> AppResult<User>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow.users().find_by_id(id).await?.ok_or_not_found("User")
    }

    async fn update_user(&self, id: Uuid, patch: UserPatch) -> AppResult<User> {
        let changes = patch.into_changes()?;
        self.uow.users().update(id, changes).await
    }

    async fn profile(&self, identity: &Identity) -> AppResult<Profile> {
        let profiles = self.uow.profiles();
        match identity.role {
            UserRole::Farmer => profiles
                .farmer_profile(identity.id)
                .await?
                .map(Profile::Farmer)
                .ok_or_not_found("Farmer profile"),
            UserRole::Customer => profiles
                .customer_profile(identity.id)
                .await?
                .map(Profile::Customer)
                .ok_or_not_found("Customer profile"),
            UserRole::Admin => Err(AppError::not_found("Profile")),
        }
    }

    async fn update_farmer_profile(
        &self,
        identity: &Identity,
        patch: FarmerProfilePatch,
    ) -> AppResult<FarmerProfile> {
        identity.require(UserRole::Farmer)?;
        let changes = patch.into_changes()?;
        self.uow
            .profiles()
            .update_farmer_profile(identity.id, changes)
            .await
    }

    async fn update_customer_profile(
        &self,
        identity: &Identity,
        patch: CustomerProfilePatch,
    ) -> AppResult<CustomerProfile> {
        identity.require(UserRole::Customer)?;
        self.uow
            .profiles()
            .update_customer_profile(identity.id, patch.into())
            .await
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> AppResult<User> {
        let user = self.uow.users().set_active(id, is_active).await?;
        tracing::info!(user_id = %id, is_active, "user activation changed");
        Ok(user)
    }
}
