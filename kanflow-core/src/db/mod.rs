/// Database layer
///
/// # Modules
///
/// - `pool`: SQLite connection pool with foreign keys enabled and a startup
///   health check
/// - `migrations`: embedded migration runner

pub mod migrations;
pub mod pool;
