/// Comment lifecycle operations
///
/// Read and create are open to anyone with board access. Delete is
/// author-only: the board owner cannot remove another member's comment.

use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::authz::{require, Action};
use crate::error::{CoreError, CoreResult};
use crate::models::board::Board;
use crate::models::comment::{Comment, CommentView};
use crate::models::task::Task;

/// Comments on a task, oldest first
pub async fn list_comments(
    pool: &SqlitePool,
    actor: Uuid,
    task_id: Uuid,
) -> CoreResult<Vec<CommentView>> {
    let mut tx = pool.begin().await?;

    let task = Task::find_by_id(&mut tx, task_id)
        .await?
        .ok_or(CoreError::NotFound("task"))?;

    let access = Board::access(&mut tx, task.board_id, actor)
        .await?
        .ok_or(CoreError::NotFound("task"))?;
    require(actor, &Action::CommentRead, access, "task")?;

    let views = Comment::views_for_task(&mut tx, task_id).await?;

    tx.commit().await?;

    Ok(views)
}

/// Adds a comment to a task, authored by the actor
///
/// # Errors
///
/// - `NotFound` if the task doesn't exist or the actor can't see its board
/// - `Validation` if the content is empty or whitespace
pub async fn create_comment(
    pool: &SqlitePool,
    actor: Uuid,
    task_id: Uuid,
    content: &str,
) -> CoreResult<CommentView> {
    if content.trim().is_empty() {
        return Err(CoreError::Validation(
            "content must not be empty".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;

    let task = Task::find_by_id(&mut tx, task_id)
        .await?
        .ok_or(CoreError::NotFound("task"))?;

    let access = Board::access(&mut tx, task.board_id, actor)
        .await?
        .ok_or(CoreError::NotFound("task"))?;
    require(actor, &Action::CommentCreate, access, "task")?;

    let comment = Comment::create(&mut tx, task_id, actor, content).await?;

    let views = Comment::views_for_task(&mut tx, task_id).await?;
    let view = views
        .into_iter()
        .find(|v| v.id == comment.id)
        .ok_or(CoreError::NotFound("comment"))?;

    tx.commit().await?;

    info!(comment_id = %comment.id, task_id = %task_id, "comment created");

    Ok(view)
}

/// Deletes a comment the actor authored
///
/// Board access is checked first so outsiders get `NotFound`; members who
/// aren't the author get `Forbidden`.
pub async fn delete_comment(
    pool: &SqlitePool,
    actor: Uuid,
    task_id: Uuid,
    comment_id: Uuid,
) -> CoreResult<()> {
    let mut tx = pool.begin().await?;

    let task = Task::find_by_id(&mut tx, task_id)
        .await?
        .ok_or(CoreError::NotFound("task"))?;

    let access = Board::access(&mut tx, task.board_id, actor)
        .await?
        .ok_or(CoreError::NotFound("task"))?;

    let comment = Comment::find_in_task(&mut tx, task_id, comment_id)
        .await?
        .ok_or(CoreError::NotFound("comment"))?;

    require(
        actor,
        &Action::CommentDelete {
            author: comment.author_id,
        },
        access,
        "comment",
    )?;

    Comment::delete(&mut tx, comment_id).await?;

    tx.commit().await?;

    info!(comment_id = %comment_id, task_id = %task_id, "comment deleted");

    Ok(())
}
