//! Resolved caller identity and the role gate.

use uuid::Uuid;

use super::user::{User, UserRole};
use crate::errors::{AppError, AppResult};

/// Caller resolved from a bearer token, attached to each authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl Identity {
    /// Shorthand for [`authorize`] with a required role.
    pub fn require(&self, role: UserRole) -> AppResult<()> {
        authorize(self, Some(role))
    }
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Role check for an endpoint.
///
/// `None` means the endpoint is open to any authenticated caller. Roles must
/// match exactly; admins get no implicit access to farmer or customer routes.
pub fn authorize(identity: &Identity, required: Option<UserRole>) -> AppResult<()> {
    match required {
        Some(role) if identity.role != role => Err(AppError::Forbidden),
        _ => Ok(()),
    }
}
