//! User domain entity and related types.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::patch::Patch;
use crate::config::{ROLE_ADMIN, ROLE_CUSTOMER, ROLE_FARMER};
use crate::errors::AppError;

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Farmer,
    Customer,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Farmer => ROLE_FARMER,
            UserRole::Customer => ROLE_CUSTOMER,
            UserRole::Admin => ROLE_ADMIN,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_FARMER => Ok(UserRole::Farmer),
            ROLE_CUSTOMER => Ok(UserRole::Customer),
            ROLE_ADMIN => Ok(UserRole::Admin),
            other => Err(AppError::internal(format!("Unknown role: {}", other))),
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Registration data transfer object
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterUser {
    #[validate(email(message = "Invalid email address"))]
    #[schema(example = "farmer@example.com")]
    pub email: String,
    /// Plain-text password, at most 72 bytes
    #[schema(example = "hunter2-but-longer")]
    pub password: String,
    #[schema(example = "farmer")]
    pub role: UserRole,
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    #[schema(example = "Ada")]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    #[schema(example = "Greenfield")]
    pub last_name: String,
    #[validate(length(max = 20))]
    #[schema(example = "+1-555-0100")]
    pub phone: Option<String>,
}

/// Partial update of the caller's own user record.
///
/// Omitted fields are left untouched; `phone: null` clears the number.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UserPatch {
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "Ada")]
    pub first_name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub last_name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "+1-555-0199")]
    pub phone: Patch<String>,
}

/// Resolved column changes for a [`UserPatch`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<Option<String>>,
}

impl UserPatch {
    pub fn into_changes(self) -> Result<UserChanges, AppError> {
        let first_name = self.first_name.into_required("first_name")?;
        let last_name = self.last_name.into_required("last_name")?;
        for name in first_name.iter().chain(last_name.iter()) {
            if name.trim().is_empty() {
                return Err(AppError::validation("Name must not be empty"));
            }
        }
        Ok(UserChanges {
            first_name,
            last_name,
            phone: self.phone.into_nullable(),
        })
    }
}

/// Admin toggle for a user's active flag
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetUserActive {
    pub is_active: bool,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "farmer@example.com")]
    pub email: String,
    pub role: UserRole,
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Greenfield")]
    pub last_name: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            is_active: user.is_active,
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}
