//! Domain service for authentication.
//!
//! Handles registration, login, token refresh and revocation of personal
//! access tokens.

use serde::Serialize;
use thiserror::Error;

use crate::api::types::{LoginRequest, RegisterRequest};
use crate::db::{ResolvedToken, User};
use crate::domain::{AuthContext, FieldErrors, UserId};

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(FieldErrors),

    /// Same error for unknown email and wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Access token required")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

impl From<FieldErrors> for AuthError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Public user fields returned by register and login.
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            created_at: user.created_at.clone(),
        }
    }
}

/// User fields returned by `/me`.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub email_verified_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            email_verified_at: user.email_verified_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Register and login payload.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResult {
    pub user: AuthUser,
    pub token: String,
    pub token_type: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeResult {
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshResult {
    pub token: String,
    pub token_type: &'static str,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates an account and its first token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] for malformed input or a taken email.
    async fn register(&self, request: RegisterRequest) -> Result<AuthResult, AuthError>;

    /// Verifies credentials, revokes every existing token of the user and
    /// issues a new one.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, request: LoginRequest) -> Result<AuthResult, AuthError>;

    /// Revokes only the token that authenticated the request.
    async fn logout(&self, ctx: &AuthContext) -> Result<(), AuthError>;

    /// Revokes every token of the user. Returns how many were revoked.
    async fn logout_all(&self, ctx: &AuthContext) -> Result<u64, AuthError>;

    async fn me(&self, ctx: &AuthContext) -> Result<MeResult, AuthError>;

    /// Replaces the presented token with a new one.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] if the presented token was revoked
    /// in the meantime.
    async fn refresh(&self, ctx: &AuthContext) -> Result<RefreshResult, AuthError>;

    /// Resolves a presented bearer token. `Ok(None)` for unknown or revoked
    /// tokens.
    async fn resolve_token(&self, presented: &str) -> Result<Option<ResolvedToken>, AuthError>;

    /// Records use of a token; failures are not fatal to the request.
    async fn touch_token(&self, ctx: &AuthContext) -> Result<(), AuthError>;
}
