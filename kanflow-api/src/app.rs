/// Application state and router builder
///
/// This module defines the shared application state, the bearer-token
/// authentication middleware, and a function to build the Axum router with
/// all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use kanflow_api::{app::{build_router, AppState}, config::Config};
/// use kanflow_core::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig {
///     url: config.database.url.clone(),
///     max_connections: config.database.max_connections,
///     ..Default::default()
/// })
/// .await?;
/// let state = AppState::new(pool, config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use crate::error::ApiError;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
    routing::{delete, get, patch, post},
    Router,
};
use kanflow_core::ops::identity;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use uuid::Uuid;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: SqlitePool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Authenticated caller, inserted into request extensions by
/// [`token_auth_layer`]
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub fullname: String,
}

/// Bearer-token authentication middleware
///
/// Extracts `Authorization: Bearer <token>`, resolves it against the token
/// store, and stashes the caller in request extensions. Every failure mode
/// is a 401.
pub async fn token_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Expected Bearer token".to_string()))?;

    let user = identity::resolve(&state.db, token).await?;

    req.extensions_mut().insert(CurrentUser {
        id: user.id,
        email: user.email,
        fullname: user.fullname,
    });

    Ok(next.run(req).await)
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                              # Health check (public)
/// └── /api/
///     ├── POST   /registration             # Public
///     ├── POST   /login                    # Public
///     ├── GET    /email-check              # Authenticated
///     ├── GET    /boards                   # Authenticated
///     ├── POST   /boards
///     ├── GET    /boards/:id
///     ├── PATCH  /boards/:id
///     ├── DELETE /boards/:id
///     ├── GET    /tasks/assigned-to-me
///     ├── GET    /tasks/reviewing
///     ├── POST   /tasks
///     ├── PATCH  /tasks/:id
///     ├── DELETE /tasks/:id
///     ├── GET    /tasks/:task_id/comments
///     ├── POST   /tasks/:task_id/comments
///     └── DELETE /tasks/:task_id/comments/:id
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Bearer-token authentication (everything under /api except
///    registration and login)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Registration and login (public, no auth)
    let public_routes = Router::new()
        .route("/registration", post(routes::auth::registration))
        .route("/login", post(routes::auth::login));

    // Everything else requires a valid bearer token
    let protected_routes = Router::new()
        .route("/email-check", get(routes::auth::email_check))
        .route(
            "/boards",
            get(routes::boards::list_boards).post(routes::boards::create_board),
        )
        .route(
            "/boards/:board_id",
            get(routes::boards::get_board)
                .patch(routes::boards::update_board)
                .delete(routes::boards::delete_board),
        )
        .route("/tasks", post(routes::tasks::create_task))
        .route("/tasks/assigned-to-me", get(routes::tasks::assigned_to_me))
        .route("/tasks/reviewing", get(routes::tasks::reviewing))
        .route(
            "/tasks/:task_id",
            patch(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        .route(
            "/tasks/:task_id/comments",
            get(routes::comments::list_comments).post(routes::comments::create_comment),
        )
        .route(
            "/tasks/:task_id/comments/:comment_id",
            delete(routes::comments::delete_comment),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            token_auth_layer,
        ));

    let api_routes = Router::new().merge(public_routes).merge(protected_routes);

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
