/// Database migration runner
///
/// Migrations live in the `migrations/` directory at the workspace root and
/// are embedded into the binary with `sqlx::migrate!`, so deployments never
/// depend on the files being present on disk.

use sqlx::SqlitePool;
use tracing::{info, warn};

/// Runs all pending database migrations
///
/// # Errors
///
/// Returns an error if a migration file is malformed or fails to execute.
/// A failing migration is rolled back.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    let migrations = sqlx::migrate!("../migrations");

    match migrations.run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}
