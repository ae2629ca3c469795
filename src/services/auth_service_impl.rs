//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use std::future::Future;
use std::sync::OnceLock;
use tracing::{info, warn};

use crate::api::types::{LoginRequest, RegisterRequest};
use crate::api::validation::{validate_login, validate_register};
use crate::config::SecurityConfig;
use crate::constants::auth::{TOKEN_NAME, TOKEN_TYPE};
use crate::db::repositories::user::{hash_password_blocking, verify_password_blocking};
use crate::db::{NewUser, ResolvedToken, Store};
use crate::domain::{AuthContext, FieldErrors};
use crate::services::auth_service::{
    AuthError, AuthResult, AuthService, AuthUser, MeResult, RefreshResult, UserProfile,
};

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
    /// Verified against when the email is unknown so both failure paths
    /// cost one Argon2 verification.
    dummy_hash: OnceLock<String>,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self {
            store,
            security,
            dummy_hash: OnceLock::new(),
        }
    }

    async fn dummy_hash(&self) -> Result<String, AuthError> {
        if let Some(hash) = self.dummy_hash.get() {
            return Ok(hash.clone());
        }
        let hash =
            hash_password_blocking("not-a-real-password".to_string(), self.security.clone())
                .await?;
        Ok(self.dummy_hash.get_or_init(|| hash).clone())
    }
}

/// Run a compound write on its own task so that dropping the request
/// future cannot abandon it half way.
async fn detached<F, T>(fut: F) -> Result<T, AuthError>
where
    F: Future<Output = anyhow::Result<T>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(fut)
        .await
        .map_err(|e| AuthError::Internal(format!("Auth task failed: {e}")))?
        .map_err(AuthError::from)
}

fn record(event: &'static str, outcome: &'static str) {
    metrics::counter!("auth_events_total", "event" => event, "outcome" => outcome).increment(1);
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(&self, request: RegisterRequest) -> Result<AuthResult, AuthError> {
        let registration =
            validate_register(request, self.security.password_min_length).inspect_err(|_| {
                record("register", "invalid");
            })?;

        if self.store.email_exists(&registration.email).await? {
            record("register", "invalid");
            return Err(AuthError::Validation(FieldErrors::single(
                "email",
                "The email has already been taken.",
            )));
        }

        let password_hash =
            hash_password_blocking(registration.password, self.security.clone()).await?;

        let store = self.store.clone();
        let email = registration.email.clone();
        let new_user = NewUser {
            name: registration.name,
            email: registration.email,
            password_hash,
            email_verified: false,
        };

        let created =
            detached(async move { store.create_user_with_token(new_user, TOKEN_NAME).await })
                .await;

        let (user, token) = match created {
            Ok(created) => created,
            Err(err) => {
                // Lost a race on the unique email index.
                if self.store.email_exists(&email).await.unwrap_or(false) {
                    record("register", "invalid");
                    return Err(AuthError::Validation(FieldErrors::single(
                        "email",
                        "The email has already been taken.",
                    )));
                }
                record("register", "error");
                return Err(err);
            }
        };

        record("register", "success");
        info!(user_id = %user.id, "User registered");

        Ok(AuthResult {
            user: AuthUser::from(&user),
            token: token.plaintext,
            token_type: TOKEN_TYPE,
        })
    }

    async fn login(&self, request: LoginRequest) -> Result<AuthResult, AuthError> {
        let (email, password) = validate_login(request.email, request.password)?;

        let Some((user, password_hash)) = self.store.get_user_with_password(&email).await? else {
            let hash = self.dummy_hash().await?;
            let _ = verify_password_blocking(hash, password).await;
            record("login", "invalid_credentials");
            warn!("Login failed: invalid credentials");
            return Err(AuthError::InvalidCredentials);
        };

        // Only a real mismatch is a credentials failure; a corrupt hash is not.
        let valid = verify_password_blocking(password_hash, password)
            .await
            .inspect_err(|e| {
                record("login", "error");
                tracing::error!(user_id = %user.id, error = %e, "Password verification failed");
            })?;
        if !valid {
            record("login", "invalid_credentials");
            warn!(user_id = %user.id, "Login failed: invalid credentials");
            return Err(AuthError::InvalidCredentials);
        }

        let store = self.store.clone();
        let user_id = user.id;
        let token =
            detached(async move { store.replace_all_tokens(user_id, TOKEN_NAME).await }).await?;

        record("login", "success");
        info!(user_id = %user.id, "User logged in");

        Ok(AuthResult {
            user: AuthUser::from(&user),
            token: token.plaintext,
            token_type: TOKEN_TYPE,
        })
    }

    async fn logout(&self, ctx: &AuthContext) -> Result<(), AuthError> {
        let revoked = self.store.revoke_token(ctx.token_id).await?;
        record("logout", "success");
        info!(user_id = %ctx.user_id, revoked, "Token revoked");
        Ok(())
    }

    async fn logout_all(&self, ctx: &AuthContext) -> Result<u64, AuthError> {
        let revoked = self.store.revoke_all_tokens(ctx.user_id).await?;
        record("logout_all", "success");
        info!(user_id = %ctx.user_id, revoked, "All tokens revoked");
        Ok(revoked)
    }

    async fn me(&self, ctx: &AuthContext) -> Result<MeResult, AuthError> {
        let user = self
            .store
            .get_user(ctx.user_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        Ok(MeResult {
            user: UserProfile::from(user),
        })
    }

    async fn refresh(&self, ctx: &AuthContext) -> Result<RefreshResult, AuthError> {
        let store = self.store.clone();
        let (user_id, token_id) = (ctx.user_id, ctx.token_id);

        let rotated =
            detached(async move { store.rotate_token(user_id, token_id, TOKEN_NAME).await })
                .await?;

        let Some(token) = rotated else {
            record("refresh", "invalid_token");
            return Err(AuthError::InvalidToken);
        };

        record("refresh", "success");
        info!(user_id = %ctx.user_id, "Token refreshed");

        Ok(RefreshResult {
            token: token.plaintext,
            token_type: TOKEN_TYPE,
        })
    }

    async fn resolve_token(&self, presented: &str) -> Result<Option<ResolvedToken>, AuthError> {
        Ok(self.store.resolve_token(presented).await?)
    }

    async fn touch_token(&self, ctx: &AuthContext) -> Result<(), AuthError> {
        Ok(self.store.touch_token(ctx.token_id).await?)
    }
}
