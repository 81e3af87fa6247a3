/// Database connection pool management
///
/// This module provides a SQLite connection pool using sqlx, with foreign
/// key enforcement enabled on every connection and a health check run at
/// startup.
///
/// # Example
///
/// ```no_run
/// use kanflow_core::db::pool::{create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), sqlx::Error> {
///     let config = DatabaseConfig {
///         url: "sqlite://kanflow.db".to_string(),
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///
///     let row: (i64,) = sqlx::query_as("SELECT 1")
///         .fetch_one(&pool)
///         .await?;
///     assert_eq!(row.0, 1);
///
///     Ok(())
/// }
/// ```

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Configuration for the database connection pool
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// SQLite connection URL (e.g. "sqlite://kanflow.db" or "sqlite::memory:")
    pub url: String,

    /// Maximum number of connections in the pool
    ///
    /// Note: an in-memory database is private to a single connection, so
    /// tests that use "sqlite::memory:" must set this to 1.
    pub max_connections: u32,

    /// Timeout for acquiring a connection from the pool (seconds)
    pub acquire_timeout_seconds: u64,

    /// Create the database file if it does not exist yet
    pub create_if_missing: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 5,
            acquire_timeout_seconds: 30,
            create_if_missing: true,
        }
    }
}

/// Creates and initializes a SQLite connection pool
///
/// Foreign key enforcement is switched on for every connection; the cascade
/// invariants of the schema depend on it.
///
/// # Errors
///
/// Returns an error if the URL is invalid, the database cannot be opened,
/// or the health check fails.
pub async fn create_pool(config: DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    info!(
        max_connections = config.max_connections,
        url = %config.url,
        "Creating database connection pool"
    );

    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(config.create_if_missing)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
        .connect_with(options)
        .await?;

    health_check(&pool).await?;

    info!("Database connection pool created successfully");
    Ok(pool)
}

/// Performs a health check on the database connection
///
/// Executes a trivial query to verify the database is reachable.
pub async fn health_check(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    debug!("Performing database health check");

    let result: (i64,) = sqlx::query_as("SELECT 1").fetch_one(pool).await?;

    if result.0 == 1 {
        debug!("Database health check passed");
        Ok(())
    } else {
        Err(sqlx::Error::Protocol(
            "Health check returned unexpected value".into(),
        ))
    }
}
