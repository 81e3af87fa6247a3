/// Identity store operations: registration, login, token resolution
///
/// Tokens are opaque bearer strings (see [`crate::auth::token`]); only their
/// SHA-256 digest is persisted. Login rotates the user's token. Login
/// failures use one undifferentiated message for unknown email and wrong
/// password so accounts cannot be enumerated through this path; the
/// email-check lookup below is the one deliberate exception (it exists for
/// the member picker UX and requires an authenticated caller).

use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::auth::{password, token};
use crate::error::{CoreError, CoreResult};
use crate::models::token::AuthToken;
use crate::models::user::{CreateUser, User, UserPublic};

/// Result of a successful registration or login
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// The authenticated user's public profile
    pub user: UserPublic,

    /// Plaintext bearer token; shown once, never stored
    pub token: String,
}

/// Registers a new user and issues their first token
///
/// # Errors
///
/// - `Validation` if the passwords do not match or the password is empty
/// - `Conflict` if the email is already registered (case-insensitive)
pub async fn register(
    pool: &SqlitePool,
    fullname: &str,
    email: &str,
    password: &str,
    repeated_password: &str,
) -> CoreResult<AuthSession> {
    if password != repeated_password {
        return Err(CoreError::Validation("passwords do not match".to_string()));
    }
    if password.is_empty() {
        return Err(CoreError::Validation("password must not be empty".to_string()));
    }

    let password_hash = password::hash_password(password)?;

    let mut tx = pool.begin().await?;

    if User::email_exists(&mut tx, email).await? {
        return Err(CoreError::Conflict("email already registered".to_string()));
    }

    let user = User::create(
        &mut tx,
        CreateUser {
            email: email.to_string(),
            fullname: fullname.to_string(),
            password_hash,
        },
    )
    .await?;

    let (plaintext, hash) = token::generate_token();
    AuthToken::insert(&mut tx, user.id, &hash).await?;

    tx.commit().await?;

    info!(user_id = %user.id, "user registered");

    Ok(AuthSession {
        user: user.into(),
        token: plaintext,
    })
}

/// Authenticates a user with email and password, rotating their token
///
/// # Errors
///
/// `Authentication` on unknown email or wrong password; the message does
/// not reveal which.
pub async fn login(pool: &SqlitePool, email: &str, password: &str) -> CoreResult<AuthSession> {
    let mut tx = pool.begin().await?;

    let user = User::find_by_email(&mut tx, email)
        .await?
        .ok_or_else(|| CoreError::Authentication("invalid email or password".to_string()))?;

    if !password::verify_password(password, &user.password_hash)? {
        return Err(CoreError::Authentication(
            "invalid email or password".to_string(),
        ));
    }

    // Rotate: earlier tokens stop working as of this login.
    AuthToken::revoke_for_user(&mut tx, user.id).await?;

    let (plaintext, hash) = token::generate_token();
    AuthToken::insert(&mut tx, user.id, &hash).await?;

    tx.commit().await?;

    info!(user_id = %user.id, "user logged in");

    Ok(AuthSession {
        user: user.into(),
        token: plaintext,
    })
}

/// Resolves a bearer token to its user
///
/// Read-only; no side effects and no expiry in the base design.
///
/// # Errors
///
/// `Authentication` if the token is malformed or unknown.
pub async fn resolve(pool: &SqlitePool, presented: &str) -> CoreResult<User> {
    if !token::validate_token_format(presented) {
        return Err(CoreError::Authentication("invalid token".to_string()));
    }

    let mut conn = pool.acquire().await?;
    let hash = token::hash_token(presented);

    AuthToken::find_user(&mut conn, &hash)
        .await?
        .ok_or_else(|| CoreError::Authentication("invalid token".to_string()))
}

/// Checks whether an email is registered (case-insensitive); pure lookup
pub async fn email_exists(pool: &SqlitePool, email: &str) -> CoreResult<bool> {
    let mut conn = pool.acquire().await?;
    Ok(User::email_exists(&mut conn, email).await?)
}

/// Looks up the public profile behind an email address
///
/// Backs the authenticated email-check endpoint; returns `None` when no
/// account matches.
pub async fn find_profile_by_email(
    pool: &SqlitePool,
    email: &str,
) -> CoreResult<Option<UserPublic>> {
    let mut conn = pool.acquire().await?;
    Ok(User::find_by_email(&mut conn, email).await?.map(Into::into))
}

/// Looks up a public profile by user ID
pub async fn find_profile_by_id(pool: &SqlitePool, id: Uuid) -> CoreResult<Option<UserPublic>> {
    let mut conn = pool.acquire().await?;
    Ok(User::find_by_id(&mut conn, id).await?.map(Into::into))
}
