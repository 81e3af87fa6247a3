//! # KanFlow API Server
//!
//! Kanban board HTTP API: accounts, boards with owners and members, tasks
//! with assignee/reviewer roles, and task comments.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=sqlite://kanflow.db cargo run -p kanflow-api
//! ```

use kanflow_api::app::{build_router, AppState};
use kanflow_api::config::Config;
use kanflow_core::db::migrations::run_migrations;
use kanflow_core::db::pool::{create_pool, DatabaseConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kanflow_api=debug,kanflow_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "KanFlow API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&pool).await?;

    let bind_address = config.bind_address();
    let state = AppState::new(pool, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
