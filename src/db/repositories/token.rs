use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use sha2::{Digest, Sha256};

use super::user::User;
use crate::constants::auth::TOKEN_SECRET_BYTES;
use crate::domain::{TokenId, UserId};
use crate::entities::{personal_access_tokens, prelude::*};

/// A freshly issued token. `plaintext` is shown to the client once and is
/// not recoverable afterwards.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub id: TokenId,
    pub plaintext: String,
}

/// A presented token that matched a live row.
#[derive(Debug, Clone)]
pub struct ResolvedToken {
    pub token_id: TokenId,
    pub user: User,
}

pub struct TokenRepository {
    conn: DatabaseConnection,
}

impl TokenRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Look up the owner of a presented plaintext token.
    ///
    /// Returns `None` for unknown, malformed or revoked tokens.
    pub async fn resolve(&self, presented: &str) -> Result<Option<ResolvedToken>> {
        let Some((id, secret)) = parse_plaintext(presented) else {
            return Ok(None);
        };
        let hash = hash_secret(secret);

        let query = PersonalAccessTokens::find()
            .filter(personal_access_tokens::Column::TokenHash.eq(hash));
        let query = match id {
            Some(id) => query.filter(personal_access_tokens::Column::Id.eq(id)),
            None => query,
        };

        let row = query
            .find_also_related(Users)
            .one(&self.conn)
            .await
            .context("Failed to query access token")?;

        Ok(row.and_then(|(token, user)| {
            user.map(|user| ResolvedToken {
                token_id: TokenId::new(token.id),
                user: User::from(user),
            })
        }))
    }

    /// Record that a token was just used to authenticate a request.
    pub async fn touch(&self, token_id: TokenId) -> Result<()> {
        PersonalAccessTokens::update_many()
            .col_expr(
                personal_access_tokens::Column::LastUsedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().to_rfc3339()),
            )
            .filter(personal_access_tokens::Column::Id.eq(token_id.value()))
            .exec(&self.conn)
            .await
            .context("Failed to update token last_used_at")?;
        Ok(())
    }

    /// Issue a standalone token without touching the user's other tokens.
    pub async fn issue(&self, user_id: UserId, name: &str) -> Result<IssuedToken> {
        insert_token(&self.conn, user_id, name).await
    }

    /// Revoke one token. Returns `false` if it was already gone.
    pub async fn revoke(&self, token_id: TokenId) -> Result<bool> {
        let result = PersonalAccessTokens::delete_by_id(token_id.value())
            .exec(&self.conn)
            .await
            .context("Failed to revoke access token")?;
        Ok(result.rows_affected > 0)
    }

    /// Revoke every token owned by `user_id`.
    pub async fn revoke_all(&self, user_id: UserId) -> Result<u64> {
        let result = PersonalAccessTokens::delete_many()
            .filter(personal_access_tokens::Column::UserId.eq(user_id.value()))
            .exec(&self.conn)
            .await
            .context("Failed to revoke user tokens")?;
        Ok(result.rows_affected)
    }

    /// Revoke all of a user's tokens and issue a new one atomically.
    pub async fn replace_all(&self, user_id: UserId, name: &str) -> Result<IssuedToken> {
        let txn = self.conn.begin().await?;

        PersonalAccessTokens::delete_many()
            .filter(personal_access_tokens::Column::UserId.eq(user_id.value()))
            .exec(&txn)
            .await
            .context("Failed to revoke previous tokens")?;

        let issued = insert_token(&txn, user_id, name).await?;

        txn.commit().await?;
        Ok(issued)
    }

    /// Swap `token_id` for a new token atomically.
    ///
    /// Returns `None` without issuing anything when the presented token
    /// was revoked concurrently.
    pub async fn rotate(
        &self,
        user_id: UserId,
        token_id: TokenId,
        name: &str,
    ) -> Result<Option<IssuedToken>> {
        let txn = self.conn.begin().await?;

        let deleted = PersonalAccessTokens::delete_many()
            .filter(personal_access_tokens::Column::Id.eq(token_id.value()))
            .filter(personal_access_tokens::Column::UserId.eq(user_id.value()))
            .exec(&txn)
            .await
            .context("Failed to revoke presented token")?;

        if deleted.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(None);
        }

        let issued = insert_token(&txn, user_id, name).await?;

        txn.commit().await?;
        Ok(Some(issued))
    }

    pub async fn count_for_user(&self, user_id: UserId) -> Result<u64> {
        use sea_orm::PaginatorTrait;

        let count = PersonalAccessTokens::find()
            .filter(personal_access_tokens::Column::UserId.eq(user_id.value()))
            .count(&self.conn)
            .await?;
        Ok(count)
    }
}

/// Insert a token row on any connection or open transaction.
pub(crate) async fn insert_token<C>(db: &C, user_id: UserId, name: &str) -> Result<IssuedToken>
where
    C: ConnectionTrait,
{
    let secret = generate_secret();
    let now = chrono::Utc::now().to_rfc3339();

    let active = personal_access_tokens::ActiveModel {
        user_id: Set(user_id.value()),
        name: Set(name.to_string()),
        token_hash: Set(hash_secret(&secret)),
        created_at: Set(now),
        ..Default::default()
    };

    let res = PersonalAccessTokens::insert(active)
        .exec(db)
        .await
        .context("Failed to insert access token")?;

    let id = TokenId::new(res.last_insert_id);
    Ok(IssuedToken {
        id,
        plaintext: format_plaintext(id, &secret),
    })
}

/// Random token secret (64 character hex string)
#[must_use]
pub fn generate_secret() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; TOKEN_SECRET_BYTES] = rng.random();
    to_hex(&bytes)
}

/// SHA-256 of a token secret, hex encoded. This is the only form persisted.
#[must_use]
pub fn hash_secret(secret: &str) -> String {
    to_hex(&Sha256::digest(secret.as_bytes()))
}

/// Plaintext handed to clients: `<row id>|<secret>`.
#[must_use]
pub fn format_plaintext(id: TokenId, secret: &str) -> String {
    format!("{id}|{secret}")
}

/// Split a presented token into its optional row id and secret.
///
/// Tokens without an id prefix are matched by hash alone. Returns `None` for
/// empty secrets and non-numeric prefixes.
#[must_use]
pub fn parse_plaintext(presented: &str) -> Option<(Option<i32>, &str)> {
    let presented = presented.trim();

    let (id, secret) = match presented.split_once('|') {
        Some((id, secret)) => (Some(id.parse::<i32>().ok()?), secret),
        None => (None, presented),
    };

    if secret.is_empty() {
        return None;
    }

    Some((id, secret))
}

fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .fold(String::with_capacity(bytes.len() * 2), |mut acc, b| {
            use std::fmt::Write;
            let _ = write!(acc, "{b:02x}");
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_secrets_are_unique_hex() {
        let a = generate_secret();
        let b = generate_secret();
        assert_eq!(a.len(), TOKEN_SECRET_BYTES * 2);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn hash_is_stable_and_hides_secret() {
        let hash = hash_secret("abc");
        assert_eq!(
            hash,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_ne!(hash_secret("abd"), hash);
    }

    #[test]
    fn parse_plaintext_with_id() {
        let plaintext = format_plaintext(TokenId::new(12), "deadbeef");
        assert_eq!(plaintext, "12|deadbeef");
        assert_eq!(parse_plaintext(&plaintext), Some((Some(12), "deadbeef")));
    }

    #[test]
    fn parse_plaintext_without_id() {
        assert_eq!(parse_plaintext("invalid-token"), Some((None, "invalid-token")));
    }

    #[test]
    fn parse_plaintext_rejects_garbage() {
        assert_eq!(parse_plaintext(""), None);
        assert_eq!(parse_plaintext("12|"), None);
        assert_eq!(parse_plaintext("abc|secret"), None);
    }
}
