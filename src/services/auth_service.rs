//! Authentication service - registration, login and token resolution.
//!
//! Password hashing lives in the domain `Password` value object; user and
//! profile creation go through the Unit of Work in one transaction.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_MINUTE, TOKEN_TYPE_BEARER};
use crate::domain::{Identity, Password, RegisterUser, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::{NewUserRecord, UnitOfWork};
use crate::with_transaction;

/// Hash verified when the email is unknown, so both failure paths cost the same.
static DUMMY_PASSWORD: Lazy<Option<Password>> =
    Lazy::new(|| Password::new("timing-equalizer-not-a-real-password").ok());

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Always "bearer"
    #[schema(example = "bearer")]
    pub token_type: String,
    /// Lifetime in seconds
    #[schema(example = 1800)]
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a farmer or customer together with its empty profile
    async fn register(&self, data: RegisterUser) -> AppResult<User>;

    /// Create an administrator account (CLI only)
    async fn register_admin(
        &self,
        email: String,
        password: String,
        first_name: String,
        last_name: String,
    ) -> AppResult<User>;

    /// Exchange credentials for a bearer token
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Verify signature and expiry
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Verify a token and load the caller, re-checking the active flag
    async fn resolve(&self, token: &str) -> AppResult<Identity>;
}

fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::minutes(config.jwt_expiration_minutes);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_minutes * SECONDS_PER_MINUTE,
    })
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }

    async fn create_user(&self, record: NewUserRecord) -> AppResult<User> {
        let user = with_transaction!(self.uow, |ctx| {
            let users = ctx.users();
            if users.find_by_email(&record.email).await?.is_some() {
                return Err(AppError::EmailTaken);
            }
            let user = users.create(record).await?;
            users.create_profile(&user).await?;
            Ok::<_, AppError>(user)
        })?;

        tracing::info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(user)
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, data: RegisterUser) -> AppResult<User> {
        // Email format and name lengths are checked by the ValidatedJson extractor
        if data.role == UserRole::Admin {
            return Err(AppError::validation("Admin accounts cannot be self-registered"));
        }

        let password_hash = Password::new(&data.password)?.into_string();
        self.create_user(NewUserRecord {
            email: normalize_email(&data.email),
            password_hash,
            role: data.role,
            first_name: data.first_name,
            last_name: data.last_name,
            phone: data.phone,
        })
        .await
    }

    async fn register_admin(
        &self,
        email: String,
        password: String,
        first_name: String,
        last_name: String,
    ) -> AppResult<User> {
        let password_hash = Password::new(&password)?.into_string();
        self.create_user(NewUserRecord {
            email: normalize_email(&email),
            password_hash,
            role: UserRole::Admin,
            first_name,
            last_name,
            phone: None,
        })
        .await
    }

    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let user = self.uow.users().find_by_email(&normalize_email(&email)).await?;

        let Some(user) = user else {
            // Burn the same hashing cost as a real check
            if let Some(dummy) = DUMMY_PASSWORD.as_ref() {
                let _ = dummy.verify(&password);
            }
            return Err(AppError::InvalidCredentials);
        };

        if !Password::from_hash(user.password_hash.clone()).verify(&password) {
            return Err(AppError::InvalidCredentials);
        }
        if !user.is_active {
            return Err(AppError::InactiveUser);
        }

        tracing::debug!(user_id = %user.id, "login succeeded");
        generate_token(&user, &self.config)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    async fn resolve(&self, token: &str) -> AppResult<Identity> {
        let claims = self.verify_token(token).map_err(|_| AppError::Unauthorized)?;

        let user = self
            .uow
            .users()
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !user.is_active {
            return Err(AppError::Unauthorized);
        }

        Ok(Identity::from(&user))
    }
}
