use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tokio::task;

use super::token::{IssuedToken, insert_token};
use crate::config::SecurityConfig;
use crate::domain::UserId;
use crate::entities::users;

/// User data returned from repository (without sensitive password hash)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub email_verified_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: UserId::new(model.id),
            name: model.name,
            email: model.email,
            email_verified_at: model.email_verified_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Fields for a new account. `password_hash` must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub email_verified: bool,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Get user by email
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;

        Ok(user.map(User::from))
    }

    /// Get user by email together with the stored password hash
    pub async fn get_by_email_with_password(&self, email: &str) -> Result<Option<(User, String)>> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;

        Ok(user.map(|u| {
            let password_hash = u.password_hash.clone();
            (User::from(u), password_hash)
        }))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>> {
        let user = users::Entity::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        Ok(self.get_by_email(email).await?.is_some())
    }

    /// Insert a user row.
    pub async fn create(&self, new_user: NewUser) -> Result<User> {
        let model = new_user
            .into_active_model()
            .insert(&self.conn)
            .await
            .context("Failed to insert user")?;

        Ok(User::from(model))
    }

    /// Insert a user and its first access token in one transaction.
    pub async fn create_with_token(
        &self,
        new_user: NewUser,
        token_name: &str,
    ) -> Result<(User, IssuedToken)> {
        let txn = self.conn.begin().await?;

        let model = new_user
            .into_active_model()
            .insert(&txn)
            .await
            .context("Failed to insert user")?;
        let user = User::from(model);

        let token = insert_token(&txn, user.id, token_name).await?;

        txn.commit().await?;
        Ok((user, token))
    }
}

impl NewUser {
    fn into_active_model(self) -> users::ActiveModel {
        let now = chrono::Utc::now().to_rfc3339();

        users::ActiveModel {
            name: Set(self.name),
            email: Set(self.email),
            password_hash: Set(self.password_hash),
            email_verified_at: Set(self.email_verified.then(|| now.clone())),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
    }
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses the crate's default params.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Check a password against a stored PHC hash string.
pub fn verify_password(password_hash: &str, password: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow::anyhow!("Password verification failed: {e}")),
    }
}

/// Hash on the blocking pool; Argon2 is CPU-intensive.
pub async fn hash_password_blocking(password: String, config: SecurityConfig) -> Result<String> {
    task::spawn_blocking(move || hash_password(&password, Some(&config)))
        .await
        .context("Password hashing task panicked")?
}

/// Verify on the blocking pool; Argon2 is CPU-intensive.
pub async fn verify_password_blocking(password_hash: String, password: String) -> Result<bool> {
    task::spawn_blocking(move || verify_password(&password_hash, &password))
        .await
        .context("Password verification task panicked")?
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            ..SecurityConfig::default()
        }
    }

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("password123", Some(&fast_config())).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(&hash, "password123").unwrap());
        assert!(!verify_password(&hash, "wrongpassword").unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("password123", Some(&fast_config())).unwrap();
        let b = hash_password("password123", Some(&fast_config())).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        assert!(verify_password("not-a-hash", "password123").is_err());
    }
}
