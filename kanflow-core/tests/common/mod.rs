/// Common test utilities for the core integration tests
///
/// Every test gets its own private in-memory SQLite database with the full
/// schema applied. In-memory databases are scoped to a single connection,
/// so the pool is capped at one.

use kanflow_core::db::migrations::run_migrations;
use kanflow_core::db::pool::{create_pool, DatabaseConfig};
use kanflow_core::ops::identity::{self, AuthSession};
use sqlx::SqlitePool;

/// Creates a fresh in-memory database with migrations applied
pub async fn setup_pool() -> SqlitePool {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        ..Default::default()
    };

    let pool = create_pool(config).await.expect("failed to create pool");
    run_migrations(&pool).await.expect("failed to run migrations");
    pool
}

/// Registers a user and returns the session (public profile + token)
pub async fn register_user(pool: &SqlitePool, fullname: &str, email: &str) -> AuthSession {
    identity::register(pool, fullname, email, "correct horse battery", "correct horse battery")
        .await
        .expect("registration failed")
}
