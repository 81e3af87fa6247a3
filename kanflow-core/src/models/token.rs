/// Auth token model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE auth_tokens (
///     token_hash TEXT PRIMARY KEY,
///     user_id    BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TEXT NOT NULL
/// );
/// ```
///
/// The plaintext token never reaches this table; rows hold the SHA-256
/// digest computed by [`crate::auth::token::hash_token`]. Login rotates the
/// token: earlier rows for the user are deleted before a new one is
/// inserted, so a stolen token stops working at the next login.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;
use uuid::Uuid;

use super::user::User;

/// Stored authentication token (digest only)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuthToken {
    /// SHA-256 hex digest of the opaque token
    pub token_hash: String,

    /// Owning user
    pub user_id: Uuid,

    /// When the token was issued
    pub created_at: DateTime<Utc>,
}

impl AuthToken {
    /// Stores a token digest for a user
    pub async fn insert(
        conn: &mut SqliteConnection,
        user_id: Uuid,
        token_hash: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, AuthToken>(
            r#"
            INSERT INTO auth_tokens (token_hash, user_id, created_at)
            VALUES ($1, $2, $3)
            RETURNING token_hash, user_id, created_at
            "#,
        )
        .bind(token_hash)
        .bind(user_id)
        .bind(Utc::now())
        .fetch_one(conn)
        .await
    }

    /// Revokes all tokens belonging to a user
    ///
    /// Returns the number of tokens revoked.
    pub async fn revoke_for_user(
        conn: &mut SqliteConnection,
        user_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM auth_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }

    /// Resolves a token digest to its user in a single joined read
    pub async fn find_user(
        conn: &mut SqliteConnection,
        token_hash: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.email, u.fullname, u.password_hash, u.created_at
            FROM auth_tokens t
            JOIN users u ON u.id = t.user_id
            WHERE t.token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(conn)
        .await
    }
}
