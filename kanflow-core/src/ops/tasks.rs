/// Task lifecycle operations
///
/// Assignee/reviewer validation is strict at create and update time: the
/// referenced user must exist and hold access to the task's board. Later
/// membership drift is tolerated (the reference turns stale and surfaces on
/// read). Task deletion is open to every board member, which is broader
/// than comment deletion (author-only) and board deletion (owner-only).

use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;
use uuid::Uuid;

use crate::authz::{require, Action};
use crate::error::{CoreError, CoreResult};
use crate::models::board::Board;
use crate::models::task::{CreateTask, Task, TaskView, UpdateTask};
use crate::models::user::User;

/// Verifies that a prospective assignee or reviewer exists and can access
/// the board
///
/// `role` names the field in the error message ("assignee" / "reviewer").
async fn ensure_assignable(
    conn: &mut SqliteConnection,
    board_id: Uuid,
    user_id: Uuid,
    role: &str,
) -> CoreResult<()> {
    if User::find_by_id(conn, user_id).await?.is_none() {
        return Err(CoreError::Validation(format!("{} does not exist", role)));
    }

    let access = Board::access(conn, board_id, user_id)
        .await?
        .ok_or(CoreError::NotFound("board"))?;

    if !access.has_access() {
        return Err(CoreError::Validation(format!(
            "{} must be a member or the owner of the board",
            role
        )));
    }

    Ok(())
}

/// Creates a task on a board the actor can access
///
/// # Errors
///
/// - `NotFound` if the board doesn't exist or the actor can't see it
/// - `Validation` if assignee/reviewer don't exist or lack board access, or
///   the title is empty
pub async fn create_task(
    pool: &SqlitePool,
    actor: Uuid,
    mut input: CreateTask,
) -> CoreResult<TaskView> {
    input.title = input.title.trim().to_string();
    if input.title.is_empty() {
        return Err(CoreError::Validation("title must not be empty".to_string()));
    }

    let mut tx = pool.begin().await?;

    let access = Board::access(&mut tx, input.board_id, actor)
        .await?
        .ok_or(CoreError::NotFound("board"))?;
    require(actor, &Action::TaskCreate, access, "board")?;

    if let Some(assignee) = input.assignee_id {
        ensure_assignable(&mut tx, input.board_id, assignee, "assignee").await?;
    }
    if let Some(reviewer) = input.reviewer_id {
        ensure_assignable(&mut tx, input.board_id, reviewer, "reviewer").await?;
    }

    let task = Task::create(&mut tx, input).await?;
    let view = Task::view_by_id(&mut tx, task.id)
        .await?
        .ok_or(CoreError::NotFound("task"))?;

    tx.commit().await?;

    info!(task_id = %task.id, board_id = %task.board_id, "task created");

    Ok(view)
}

/// Applies a partial update to a task
///
/// The parent board is not reassignable; patches never carry it. Changing
/// assignee or reviewer re-runs the same membership validation as creation.
pub async fn update_task(
    pool: &SqlitePool,
    actor: Uuid,
    task_id: Uuid,
    mut patch: UpdateTask,
) -> CoreResult<TaskView> {
    let mut tx = pool.begin().await?;

    let task = Task::find_by_id(&mut tx, task_id)
        .await?
        .ok_or(CoreError::NotFound("task"))?;

    let access = Board::access(&mut tx, task.board_id, actor)
        .await?
        .ok_or(CoreError::NotFound("task"))?;
    require(actor, &Action::TaskUpdate, access, "task")?;

    if let Some(title) = patch.title {
        let title = title.trim();
        if title.is_empty() {
            return Err(CoreError::Validation("title must not be empty".to_string()));
        }
        patch.title = Some(title.to_string());
    }
    if let Some(Some(assignee)) = patch.assignee_id {
        ensure_assignable(&mut tx, task.board_id, assignee, "assignee").await?;
    }
    if let Some(Some(reviewer)) = patch.reviewer_id {
        ensure_assignable(&mut tx, task.board_id, reviewer, "reviewer").await?;
    }

    Task::update(&mut tx, task_id, patch)
        .await?
        .ok_or(CoreError::NotFound("task"))?;

    let view = Task::view_by_id(&mut tx, task_id)
        .await?
        .ok_or(CoreError::NotFound("task"))?;

    tx.commit().await?;

    Ok(view)
}

/// Deletes a task and its comments atomically
///
/// Any member or the owner of the board may delete.
pub async fn delete_task(pool: &SqlitePool, actor: Uuid, task_id: Uuid) -> CoreResult<()> {
    let mut tx = pool.begin().await?;

    let task = Task::find_by_id(&mut tx, task_id)
        .await?
        .ok_or(CoreError::NotFound("task"))?;

    let access = Board::access(&mut tx, task.board_id, actor)
        .await?
        .ok_or(CoreError::NotFound("task"))?;
    require(actor, &Action::TaskDelete, access, "task")?;

    Task::delete_cascade(&mut tx, task_id).await?;

    tx.commit().await?;

    info!(task_id = %task_id, "task deleted");

    Ok(())
}

/// All tasks where the actor is the assignee, across all boards
///
/// Stable order by task id ascending.
pub async fn assigned_to_me(pool: &SqlitePool, actor: Uuid) -> CoreResult<Vec<TaskView>> {
    let mut conn = pool.acquire().await?;
    Ok(Task::views_assigned_to(&mut conn, actor).await?)
}

/// All tasks where the actor is the reviewer, across all boards
///
/// Stable order by task id ascending.
pub async fn reviewing(pool: &SqlitePool, actor: Uuid) -> CoreResult<Vec<TaskView>> {
    let mut conn = pool.acquire().await?;
    Ok(Task::views_reviewed_by(&mut conn, actor).await?)
}
