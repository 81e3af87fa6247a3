/// Comment endpoints, nested under their task
///
/// # Endpoints
///
/// - `GET    /api/tasks/:task_id/comments` - Oldest first
/// - `POST   /api/tasks/:task_id/comments` - Create, caller is the author
/// - `DELETE /api/tasks/:task_id/comments/:id` - Author-only

use crate::{
    app::{AppState, CurrentUser},
    error::ApiResult,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use kanflow_core::models::comment::CommentView;
use kanflow_core::ops::comments;
use serde::Deserialize;
use uuid::Uuid;

/// Comment creation request
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

pub async fn list_comments(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Vec<CommentView>>> {
    let views = comments::list_comments(&state.db, user.id, task_id).await?;
    Ok(Json(views))
}

pub async fn create_comment(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<CommentView>)> {
    let view = comments::create_comment(&state.db, user.id, task_id, &payload.content).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((task_id, comment_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    comments::delete_comment(&state.db, user.id, task_id, comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
