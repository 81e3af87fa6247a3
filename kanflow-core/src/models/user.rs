/// User model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id            BLOB PRIMARY KEY,
///     email         TEXT NOT NULL UNIQUE COLLATE NOCASE,
///     fullname      TEXT NOT NULL,
///     password_hash TEXT NOT NULL,
///     created_at    TEXT NOT NULL
/// );
/// ```
///
/// Email uniqueness is case-insensitive via `COLLATE NOCASE`. Passwords are
/// stored as Argon2id hashes, never in plaintext.
///
/// All functions take `&mut SqliteConnection` so callers can run them inside
/// a transaction together with the authorization reads that guard them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use uuid::Uuid;

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Email address, unique case-insensitively
    pub email: String,

    /// Full display name
    pub fullname: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Public view of a user, safe to embed in API responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserPublic {
    pub id: Uuid,
    pub email: String,
    pub fullname: String,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            fullname: user.fullname,
        }
    }
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub fullname: String,

    /// Argon2id hash, not the plaintext password
    pub password_hash: String,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Fails with a unique-constraint violation if the email is already
    /// registered (any casing).
    pub async fn create(conn: &mut SqliteConnection, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, fullname, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, fullname, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.email)
        .bind(data.fullname)
        .bind(data.password_hash)
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(
        conn: &mut SqliteConnection,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, fullname, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    /// Finds a user by email address (case-insensitive)
    pub async fn find_by_email(
        conn: &mut SqliteConnection,
        email: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, fullname, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(conn)
        .await
    }

    /// Checks whether an email is already registered (case-insensitive)
    pub async fn email_exists(
        conn: &mut SqliteConnection,
        email: &str,
    ) -> Result<bool, sqlx::Error> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(conn)
                .await?;

        Ok(exists)
    }

    /// Checks that every ID in `ids` names an existing user
    ///
    /// Returns the first missing ID, or `None` if all exist. Used to reject
    /// member lists and assignee/reviewer references to unknown users.
    pub async fn find_missing(
        conn: &mut SqliteConnection,
        ids: &[Uuid],
    ) -> Result<Option<Uuid>, sqlx::Error> {
        for id in ids {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                    .bind(id)
                    .fetch_one(&mut *conn)
                    .await?;

            if !exists {
                return Ok(Some(*id));
            }
        }

        Ok(None)
    }
}
