/// Common test utilities for API integration tests
///
/// Each test context owns a private in-memory SQLite database (single
/// connection, migrations applied) and a fully built router, so tests run
/// hermetically and in parallel.

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use kanflow_api::app::{build_router, AppState};
use kanflow_api::config::{ApiConfig, Config, DatabaseConfig};
use kanflow_core::db::migrations::run_migrations;
use kanflow_core::db::pool::{create_pool, DatabaseConfig as PoolConfig};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::Service as _;

/// Test context containing the database pool and the router under test
pub struct TestContext {
    pub db: SqlitePool,
    pub app: axum::Router,
}

impl TestContext {
    /// Creates a new test context with a fresh in-memory database
    pub async fn new() -> anyhow::Result<Self> {
        let pool = create_pool(PoolConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            ..Default::default()
        })
        .await?;

        run_migrations(&pool).await?;

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
        };

        let state = AppState::new(pool.clone(), config);
        let app = build_router(state);

        Ok(Self { db: pool, app })
    }

    /// Sends a request through the router
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().call(request).await.expect("infallible")
    }

    /// Sends a JSON request, optionally authenticated
    pub async fn send_json(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(value) => builder
                .header("content-type", "application/json")
                .body(Body::from(value.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request construction failed");

        self.send(request).await
    }

    /// Registers a user and returns (token, user_id as string)
    pub async fn register(&self, fullname: &str, email: &str) -> (String, String) {
        let response = self
            .send_json(
                "POST",
                "/api/registration",
                None,
                Some(json!({
                    "fullname": fullname,
                    "email": email,
                    "password": "correct horse battery",
                    "repeated_password": "correct horse battery",
                })),
            )
            .await;

        assert_eq!(response.status(), StatusCode::CREATED);

        let body = read_json(response).await;
        (
            body["token"].as_str().expect("token missing").to_string(),
            body["user_id"].as_str().expect("user_id missing").to_string(),
        )
    }
}

/// Reads and parses a JSON response body
pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&bytes).expect("body is not valid JSON")
}
