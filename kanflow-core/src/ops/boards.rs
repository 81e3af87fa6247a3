/// Board lifecycle operations
///
/// Every operation resolves the actor's [`BoardAccess`] and performs its
/// mutation inside one transaction, so the membership facts used to
/// authorize cannot change between check and act. Derived counts are
/// recomputed for each response and never stored.

use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::authz::{require, Action};
use crate::error::{CoreError, CoreResult};
use crate::models::board::{Board, BoardOverview};
use crate::models::task::{Task, TaskView};
use crate::models::user::{User, UserPublic};

/// Detail view of a board: members and full task views
#[derive(Debug, Clone, serde::Serialize)]
pub struct BoardDetail {
    pub id: Uuid,
    pub title: String,
    pub owner_id: Uuid,
    pub members: Vec<UserPublic>,
    pub tasks: Vec<TaskView>,
}

/// Response shape of a board update
#[derive(Debug, Clone, serde::Serialize)]
pub struct BoardUpdated {
    pub id: Uuid,
    pub title: String,
    pub owner_data: UserPublic,
    pub members_data: Vec<UserPublic>,
}

/// Partial board update: title and/or wholesale member replacement
#[derive(Debug, Clone, Default)]
pub struct UpdateBoard {
    pub title: Option<String>,

    /// When present, *replaces* the member set (not a delta)
    pub members: Option<Vec<Uuid>>,
}

/// Lists all boards the actor owns or belongs to, with derived counts
pub async fn list_boards(pool: &SqlitePool, actor: Uuid) -> CoreResult<Vec<BoardOverview>> {
    let mut conn = pool.acquire().await?;
    Ok(Board::list_for_user(&mut conn, actor).await?)
}

/// Creates a board; the actor becomes its owner
///
/// Member IDs must reference existing users; duplicates collapse and the
/// owner is excluded from the member set.
///
/// # Errors
///
/// `Validation` on an empty title or a member ID that names no user.
pub async fn create_board(
    pool: &SqlitePool,
    actor: Uuid,
    title: &str,
    member_ids: &[Uuid],
) -> CoreResult<BoardOverview> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CoreError::Validation("title must not be empty".to_string()));
    }

    let mut tx = pool.begin().await?;

    if let Some(missing) = User::find_missing(&mut tx, member_ids).await? {
        return Err(CoreError::Validation(format!(
            "member {} does not exist",
            missing
        )));
    }

    let board = Board::create(&mut tx, actor, title).await?;
    Board::add_members(&mut tx, board.id, actor, member_ids).await?;

    let overview = Board::overview(&mut tx, board.id)
        .await?
        .ok_or(CoreError::NotFound("board"))?;

    tx.commit().await?;

    info!(board_id = %board.id, owner_id = %actor, "board created");

    Ok(overview)
}

/// Loads the detail view of a board the actor can see
///
/// # Errors
///
/// `NotFound` if the board does not exist *or* the actor has no access to
/// it (existence is hidden from outsiders).
pub async fn get_board(pool: &SqlitePool, actor: Uuid, board_id: Uuid) -> CoreResult<BoardDetail> {
    let mut tx = pool.begin().await?;

    let access = Board::access(&mut tx, board_id, actor)
        .await?
        .ok_or(CoreError::NotFound("board"))?;
    require(actor, &Action::BoardRead, access, "board")?;

    let board = Board::find_by_id(&mut tx, board_id)
        .await?
        .ok_or(CoreError::NotFound("board"))?;
    let members = Board::members(&mut tx, board_id).await?;
    let tasks = Task::views_for_board(&mut tx, board_id).await?;

    tx.commit().await?;

    Ok(BoardDetail {
        id: board.id,
        title: board.title,
        owner_id: board.owner_id,
        members,
        tasks,
    })
}

/// Applies a partial update to title and/or member set
///
/// Owner or any member may update. A new member set replaces the old one;
/// tasks whose assignee or reviewer falls outside the new set keep their
/// reference (stale, surfaced on read, never auto-nulled).
pub async fn update_board(
    pool: &SqlitePool,
    actor: Uuid,
    board_id: Uuid,
    patch: UpdateBoard,
) -> CoreResult<BoardUpdated> {
    let mut tx = pool.begin().await?;

    let access = Board::access(&mut tx, board_id, actor)
        .await?
        .ok_or(CoreError::NotFound("board"))?;
    require(actor, &Action::BoardUpdate, access, "board")?;

    let board = Board::find_by_id(&mut tx, board_id)
        .await?
        .ok_or(CoreError::NotFound("board"))?;

    if let Some(ref title) = patch.title {
        let title = title.trim();
        if title.is_empty() {
            return Err(CoreError::Validation("title must not be empty".to_string()));
        }
        Board::update_title(&mut tx, board_id, title).await?;
    }

    if let Some(ref members) = patch.members {
        if let Some(missing) = User::find_missing(&mut tx, members).await? {
            return Err(CoreError::Validation(format!(
                "member {} does not exist",
                missing
            )));
        }
        Board::set_members(&mut tx, board_id, board.owner_id, members).await?;
    }

    let updated = Board::find_by_id(&mut tx, board_id)
        .await?
        .ok_or(CoreError::NotFound("board"))?;
    let owner = User::find_by_id(&mut tx, updated.owner_id)
        .await?
        .ok_or(CoreError::NotFound("user"))?;
    let members_data = Board::members(&mut tx, board_id).await?;

    tx.commit().await?;

    Ok(BoardUpdated {
        id: updated.id,
        title: updated.title,
        owner_data: owner.into(),
        members_data,
    })
}

/// Deletes a board and, atomically, all its tasks and their comments
///
/// # Errors
///
/// - `NotFound` if the board doesn't exist or the actor can't see it
/// - `Forbidden` if the actor is a member but not the owner
pub async fn delete_board(pool: &SqlitePool, actor: Uuid, board_id: Uuid) -> CoreResult<()> {
    let mut tx = pool.begin().await?;

    let access = Board::access(&mut tx, board_id, actor)
        .await?
        .ok_or(CoreError::NotFound("board"))?;
    require(actor, &Action::BoardDelete, access, "board")?;

    Board::delete_cascade(&mut tx, board_id).await?;

    tx.commit().await?;

    info!(board_id = %board_id, owner_id = %actor, "board deleted");

    Ok(())
}
