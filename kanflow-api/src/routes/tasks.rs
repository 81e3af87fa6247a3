/// Task endpoints
///
/// # Endpoints
///
/// - `POST   /api/tasks` - Create a task on an accessible board
/// - `PATCH  /api/tasks/:id` - Partial update; the parent board is fixed
/// - `DELETE /api/tasks/:id` - Any member of the board may delete
/// - `GET    /api/tasks/assigned-to-me` - Tasks where the caller is assignee
/// - `GET    /api/tasks/reviewing` - Tasks where the caller is reviewer
///
/// Status and priority arrive as strings ("to-do", "in-progress", "review",
/// "done" / "low", "medium", "high") and are parsed in the handler so an
/// unknown value is a 400, not a deserialization failure.

use crate::{
    app::{AppState, CurrentUser},
    error::ApiResult,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use kanflow_core::models::task::{CreateTask, TaskPriority, TaskStatus, TaskView, UpdateTask};
use kanflow_core::ops::tasks;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

/// Distinguishes an absent field from an explicit null in patch bodies
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

/// Task creation request
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    /// Board the task belongs to
    pub board: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assignee_id: Option<Uuid>,
    pub reviewer_id: Option<Uuid>,
    pub due_date: Option<NaiveDate>,
}

/// Task patch request; omitted fields are left untouched, explicit nulls
/// clear the assignee/reviewer/due date
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub assignee_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub reviewer_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<NaiveDate>>,
}

pub async fn create_task(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskView>)> {
    let status = match payload.status.as_deref() {
        Some(s) => TaskStatus::parse(s)?,
        None => TaskStatus::ToDo,
    };
    let priority = match payload.priority.as_deref() {
        Some(p) => TaskPriority::parse(p)?,
        None => TaskPriority::Medium,
    };

    let view = tasks::create_task(
        &state.db,
        user.id,
        CreateTask {
            board_id: payload.board,
            title: payload.title,
            description: payload.description,
            status,
            priority,
            assignee_id: payload.assignee_id,
            reviewer_id: payload.reviewer_id,
            due_date: payload.due_date,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn update_task(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<UpdateTaskRequest>,
) -> ApiResult<Json<TaskView>> {
    let status = match payload.status.as_deref() {
        Some(s) => Some(TaskStatus::parse(s)?),
        None => None,
    };
    let priority = match payload.priority.as_deref() {
        Some(p) => Some(TaskPriority::parse(p)?),
        None => None,
    };

    let view = tasks::update_task(
        &state.db,
        user.id,
        task_id,
        UpdateTask {
            title: payload.title,
            description: payload.description,
            status,
            priority,
            assignee_id: payload.assignee_id,
            reviewer_id: payload.reviewer_id,
            due_date: payload.due_date,
        },
    )
    .await?;

    Ok(Json(view))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    tasks::delete_task(&state.db, user.id, task_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn assigned_to_me(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<TaskView>>> {
    let views = tasks::assigned_to_me(&state.db, user.id).await?;
    Ok(Json(views))
}

pub async fn reviewing(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<TaskView>>> {
    let views = tasks::reviewing(&state.db, user.id).await?;
    Ok(Json(views))
}
