/// Error types shared by all core operations
///
/// Every operation in this crate returns `Result<T, CoreError>`. The error
/// kinds map one-to-one onto the transport layer's status codes, so the API
/// crate never needs to inspect error *contents* to pick a response code.
///
/// `NotFound` is also used for deliberate information hiding: an actor with
/// no access to a board receives `NotFound` for everything beneath it, never
/// `Forbidden`, so the entity's existence does not leak.

use thiserror::Error;

/// Core result type alias
pub type CoreResult<T> = Result<T, CoreError>;

/// Unified error type for identity, authorization and lifecycle operations
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed or inconsistent input (mismatched passwords, unknown enum
    /// value, member reference to a nonexistent user, empty comment body)
    #[error("validation failed: {0}")]
    Validation(String),

    /// Missing/invalid token or bad login credentials
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Valid identity, insufficient rights on an entity the actor can see
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Entity absent, or hidden from this actor on purpose
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Uniqueness violation (duplicate email)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Underlying storage failure
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// Unexpected internal failure (e.g. a corrupt stored password hash)
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for CoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => CoreError::NotFound("resource"),
            sqlx::Error::Database(db_err)
                if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
            {
                CoreError::Conflict(db_err.to_string())
            }
            other => CoreError::Database(other),
        }
    }
}

impl From<crate::auth::password::PasswordError> for CoreError {
    fn from(err: crate::auth::password::PasswordError) -> Self {
        CoreError::Internal(format!("password operation failed: {}", err))
    }
}
