//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Error taxonomy used to pick the HTTP status of an [`AppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Authentication,
    Authorization,
    Conflict,
    State,
    Internal,
}

impl ErrorKind {
    fn status(self) -> StatusCode {
        match self {
            ErrorKind::Validation | ErrorKind::State => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
            ErrorKind::Authorization => StatusCode::FORBIDDEN,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("Inactive user")]
    InactiveUser,

    // Registration
    #[error("Email already registered")]
    EmailTaken,

    #[error("Password must not be empty")]
    PasswordEmpty,

    #[error("Password must be at most {max} bytes")]
    PasswordTooLong { max: usize },

    // Order placement
    #[error("Order must contain at least one item")]
    EmptyCart,

    #[error("Product {0} not found")]
    ProductNotFound(i32),

    #[error("Product {0} is not available")]
    ProductUnavailable(i32),

    #[error("Not enough stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: i32,
        requested: i32,
        available: i32,
    },

    #[error("Minimum order quantity for product {product_id} is {min}")]
    BelowMinimumOrder { product_id: i32, min: i32 },

    #[error("All items in an order must be from the same farmer")]
    MixedFarmerOrder,

    #[error("Order {0} not found")]
    OrderNotFound(i32),

    // Resource errors
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    // External service errors
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl AppError {
    /// Taxonomy bucket of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Unauthorized | AppError::InvalidCredentials | AppError::Jwt(_) => {
                ErrorKind::Authentication
            }
            AppError::Forbidden | AppError::InactiveUser => ErrorKind::Authorization,
            AppError::EmailTaken | AppError::MixedFarmerOrder | AppError::Conflict(_) => {
                ErrorKind::Conflict
            }
            AppError::PasswordEmpty
            | AppError::PasswordTooLong { .. }
            | AppError::EmptyCart
            | AppError::Validation(_) => ErrorKind::Validation,
            AppError::ProductUnavailable(_)
            | AppError::InsufficientStock { .. }
            | AppError::BelowMinimumOrder { .. } => ErrorKind::State,
            AppError::ProductNotFound(_) | AppError::OrderNotFound(_) | AppError::NotFound(_) => {
                ErrorKind::NotFound
            }
            AppError::Database(_) | AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::InactiveUser => "INACTIVE_USER",
            AppError::EmailTaken => "EMAIL_TAKEN",
            AppError::PasswordEmpty => "PASSWORD_EMPTY",
            AppError::PasswordTooLong { .. } => "PASSWORD_TOO_LONG",
            AppError::EmptyCart => "EMPTY_CART",
            AppError::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            AppError::ProductUnavailable(_) => "PRODUCT_UNAVAILABLE",
            AppError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            AppError::BelowMinimumOrder { .. } => "BELOW_MINIMUM_ORDER",
            AppError::MixedFarmerOrder => "MIXED_FARMER_ORDER",
            AppError::OrderNotFound(_) => "ORDER_NOT_FOUND",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Jwt(_) => "AUTH_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        self.kind().status()
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            // Hide details for internal/security errors
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Jwt(e) => {
                tracing::debug!("JWT error: {:?}", e);
                "Invalid or expired token".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::not_found(entity))
    }
}

/// Convenience constructors
impl AppError {
    pub fn not_found(entity: impl Into<String>) -> Self {
        AppError::NotFound(entity.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
