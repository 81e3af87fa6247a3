/// Board endpoints
///
/// # Endpoints
///
/// - `GET    /api/boards` - Boards the caller owns or belongs to
/// - `POST   /api/boards` - Create a board with an initial member set
/// - `GET    /api/boards/:id` - Board detail with members and tasks
/// - `PATCH  /api/boards/:id` - Retitle and/or replace the member set
/// - `DELETE /api/boards/:id` - Owner-only, cascades to tasks and comments

use crate::{
    app::{AppState, CurrentUser},
    error::ApiResult,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use kanflow_core::models::board::BoardOverview;
use kanflow_core::ops::boards::{self, BoardDetail, BoardUpdated, UpdateBoard};
use serde::Deserialize;
use uuid::Uuid;

/// Board creation request
#[derive(Debug, Deserialize)]
pub struct CreateBoardRequest {
    pub title: String,

    /// Initial member set (user ids); the owner is implicit and skipped
    #[serde(default)]
    pub members: Vec<Uuid>,
}

/// Board patch request; omitted fields are left untouched
#[derive(Debug, Deserialize)]
pub struct UpdateBoardRequest {
    pub title: Option<String>,
    pub members: Option<Vec<Uuid>>,
}

pub async fn list_boards(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<BoardOverview>>> {
    let boards = boards::list_boards(&state.db, user.id).await?;
    Ok(Json(boards))
}

pub async fn create_board(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateBoardRequest>,
) -> ApiResult<(StatusCode, Json<BoardOverview>)> {
    let overview =
        boards::create_board(&state.db, user.id, &payload.title, &payload.members).await?;
    Ok((StatusCode::CREATED, Json(overview)))
}

pub async fn get_board(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(board_id): Path<Uuid>,
) -> ApiResult<Json<BoardDetail>> {
    let detail = boards::get_board(&state.db, user.id, board_id).await?;
    Ok(Json(detail))
}

pub async fn update_board(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(board_id): Path<Uuid>,
    Json(payload): Json<UpdateBoardRequest>,
) -> ApiResult<Json<BoardUpdated>> {
    let updated = boards::update_board(
        &state.db,
        user.id,
        board_id,
        UpdateBoard {
            title: payload.title,
            members: payload.members,
        },
    )
    .await?;
    Ok(Json(updated))
}

pub async fn delete_board(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(board_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    boards::delete_board(&state.db, user.id, board_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
