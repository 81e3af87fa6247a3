/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/registration` - Register a new account, returns a bearer token
/// - `POST /api/login` - Login with email + password, rotates the token
/// - `GET /api/email-check?email=` - Look up a profile by email (authenticated)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use kanflow_core::models::user::UserPublic;
use kanflow_core::ops::identity;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegistrationRequest {
    #[validate(length(min = 1, max = 200, message = "Fullname must be 1-200 characters"))]
    pub fullname: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    pub repeated_password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
}

/// Session response shared by registration and login
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Opaque bearer token; shown once, only the digest is stored
    pub token: String,
    pub fullname: String,
    pub email: String,
    pub user_id: Uuid,
}

impl From<identity::AuthSession> for SessionResponse {
    fn from(session: identity::AuthSession) -> Self {
        Self {
            token: session.token,
            fullname: session.user.fullname,
            email: session.user.email,
            user_id: session.user.id,
        }
    }
}

/// Email-check query parameters
#[derive(Debug, Deserialize)]
pub struct EmailCheckQuery {
    pub email: String,
}

/// Registration handler
///
/// ```text
/// POST /api/registration
/// ```
pub async fn registration(
    State(state): State<AppState>,
    Json(payload): Json<RegistrationRequest>,
) -> ApiResult<(StatusCode, Json<SessionResponse>)> {
    payload.validate()?;

    let session = identity::register(
        &state.db,
        &payload.fullname,
        &payload.email,
        &payload.password,
        &payload.repeated_password,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(session.into())))
}

/// Login handler
///
/// ```text
/// POST /api/login
/// ```
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<SessionResponse>> {
    payload.validate()?;

    let session = identity::login(&state.db, &payload.email, &payload.password).await?;

    Ok(Json(session.into()))
}

/// Email-check handler
///
/// Returns the public profile behind an email address. Authenticated-only;
/// the enumeration surface is deliberate.
///
/// ```text
/// GET /api/email-check?email=someone@example.com
/// ```
pub async fn email_check(
    State(state): State<AppState>,
    Query(query): Query<EmailCheckQuery>,
) -> ApiResult<Json<UserPublic>> {
    if query.email.trim().is_empty() {
        return Err(ApiError::BadRequest("Email parameter required".to_string()));
    }

    let profile = identity::find_profile_by_email(&state.db, &query.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("email not found".to_string()))?;

    Ok(Json(profile))
}
