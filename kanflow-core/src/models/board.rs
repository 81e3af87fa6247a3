/// Board model, membership storage, and derived board statistics
///
/// # Schema
///
/// ```sql
/// CREATE TABLE boards (
///     id         BLOB PRIMARY KEY,
///     title      TEXT NOT NULL,
///     owner_id   BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TEXT NOT NULL,
///     updated_at TEXT NOT NULL
/// );
///
/// CREATE TABLE board_members (
///     board_id   BLOB NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
///     user_id    BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TEXT NOT NULL,
///     PRIMARY KEY (board_id, user_id)
/// );
/// ```
///
/// The owner is never stored in `board_members`; ownership and membership
/// are separate facts (see [`crate::authz::BoardAccess`]). Derived counts
/// ([`BoardOverview`]) are computed on read with correlated subqueries and
/// never persisted, so they cannot go stale relative to the task rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use uuid::Uuid;

use super::user::UserPublic;
use crate::authz::BoardAccess;

/// Board entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Board {
    /// Unique board ID (UUID v4)
    pub id: Uuid,

    /// Board title
    pub title: String,

    /// Owning user, set at creation, immutable
    pub owner_id: Uuid,

    /// When the board was created
    pub created_at: DateTime<Utc>,

    /// When the board was last updated
    pub updated_at: DateTime<Utc>,
}

/// Board list/creation view with derived counts
///
/// All counts are computed at read time from the underlying rows.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BoardOverview {
    pub id: Uuid,
    pub title: String,

    /// Size of the member set (the owner is not counted)
    pub member_count: i64,

    /// Number of tasks on the board
    pub ticket_count: i64,

    /// Tasks with status `to-do`
    pub tasks_to_do_count: i64,

    /// Tasks with priority `high`
    pub tasks_high_prio_count: i64,

    pub owner_id: Uuid,
}

/// Select list shared by the overview queries
const OVERVIEW_COLUMNS: &str = r#"
    b.id,
    b.title,
    (SELECT COUNT(*) FROM board_members m WHERE m.board_id = b.id) AS member_count,
    (SELECT COUNT(*) FROM tasks t WHERE t.board_id = b.id) AS ticket_count,
    (SELECT COUNT(*) FROM tasks t WHERE t.board_id = b.id AND t.status = 'to-do') AS tasks_to_do_count,
    (SELECT COUNT(*) FROM tasks t WHERE t.board_id = b.id AND t.priority = 'high') AS tasks_high_prio_count,
    b.owner_id
"#;

impl Board {
    /// Creates a new board owned by `owner_id`
    pub async fn create(
        conn: &mut SqliteConnection,
        owner_id: Uuid,
        title: &str,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now();

        sqlx::query_as::<_, Board>(
            r#"
            INSERT INTO boards (id, title, owner_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, owner_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(owner_id)
        .bind(now)
        .bind(now)
        .fetch_one(conn)
        .await
    }

    /// Finds a board by ID
    pub async fn find_by_id(
        conn: &mut SqliteConnection,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Board>(
            r#"
            SELECT id, title, owner_id, created_at, updated_at
            FROM boards
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    /// Loads the actor's relationship to a board in one read
    ///
    /// Returns `None` if the board does not exist. Callers must run this
    /// inside the same transaction as the mutation it authorizes, so the
    /// membership facts cannot change between check and act.
    pub async fn access(
        conn: &mut SqliteConnection,
        board_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<BoardAccess>, sqlx::Error> {
        let row: Option<(bool, bool)> = sqlx::query_as(
            r#"
            SELECT
                (b.owner_id = $2) AS is_owner,
                EXISTS(
                    SELECT 1 FROM board_members m
                    WHERE m.board_id = b.id AND m.user_id = $2
                ) AS is_member
            FROM boards b
            WHERE b.id = $1
            "#,
        )
        .bind(board_id)
        .bind(user_id)
        .fetch_optional(conn)
        .await?;

        Ok(row.map(|(is_owner, is_member)| BoardAccess {
            is_owner,
            is_member,
        }))
    }

    /// Updates the board title and bumps `updated_at`
    pub async fn update_title(
        conn: &mut SqliteConnection,
        id: Uuid,
        title: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE boards SET title = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(title)
            .bind(Utc::now())
            .execute(conn)
            .await?;

        Ok(())
    }

    /// Lists the board's members as public profiles, oldest first
    pub async fn members(
        conn: &mut SqliteConnection,
        board_id: Uuid,
    ) -> Result<Vec<UserPublic>, sqlx::Error> {
        sqlx::query_as::<_, UserPublic>(
            r#"
            SELECT u.id, u.email, u.fullname
            FROM board_members m
            JOIN users u ON u.id = m.user_id
            WHERE m.board_id = $1
            ORDER BY m.created_at ASC, u.id ASC
            "#,
        )
        .bind(board_id)
        .fetch_all(conn)
        .await
    }

    /// Adds users to the member set
    ///
    /// Already-present users and the owner are skipped silently. Caller is
    /// responsible for verifying the users exist.
    pub async fn add_members(
        conn: &mut SqliteConnection,
        board_id: Uuid,
        owner_id: Uuid,
        user_ids: &[Uuid],
    ) -> Result<(), sqlx::Error> {
        let now = Utc::now();

        for user_id in user_ids {
            if *user_id == owner_id {
                continue;
            }

            sqlx::query(
                r#"
                INSERT OR IGNORE INTO board_members (board_id, user_id, created_at)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(board_id)
            .bind(user_id)
            .bind(now)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    /// Replaces the member set wholesale
    ///
    /// Users who fall out of the set keep their assignee/reviewer
    /// references on existing tasks; the stale reference surfaces on read.
    pub async fn set_members(
        conn: &mut SqliteConnection,
        board_id: Uuid,
        owner_id: Uuid,
        user_ids: &[Uuid],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM board_members WHERE board_id = $1")
            .bind(board_id)
            .execute(&mut *conn)
            .await?;

        Self::add_members(conn, board_id, owner_id, user_ids).await
    }

    /// Lists all boards the user owns or is a member of, with derived counts
    ///
    /// Newest boards first, ID as tie-breaker for a stable order.
    pub async fn list_for_user(
        conn: &mut SqliteConnection,
        user_id: Uuid,
    ) -> Result<Vec<BoardOverview>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {OVERVIEW_COLUMNS}
            FROM boards b
            WHERE b.owner_id = $1
               OR EXISTS(
                    SELECT 1 FROM board_members m
                    WHERE m.board_id = b.id AND m.user_id = $1
               )
            ORDER BY b.created_at DESC, b.id ASC
            "#
        );

        sqlx::query_as::<_, BoardOverview>(&query)
            .bind(user_id)
            .fetch_all(conn)
            .await
    }

    /// Computes the overview (derived counts) for one board
    pub async fn overview(
        conn: &mut SqliteConnection,
        board_id: Uuid,
    ) -> Result<Option<BoardOverview>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {OVERVIEW_COLUMNS}
            FROM boards b
            WHERE b.id = $1
            "#
        );

        sqlx::query_as::<_, BoardOverview>(&query)
            .bind(board_id)
            .fetch_optional(conn)
            .await
    }

    /// Deletes the board and everything beneath it
    ///
    /// Comments, tasks and membership rows are removed explicitly, leaf
    /// first, so the cascade is complete even without the schema's
    /// `ON DELETE CASCADE` backstop. Must run inside a transaction.
    pub async fn delete_cascade(conn: &mut SqliteConnection, id: Uuid) -> Result<bool, sqlx::Error> {
        sqlx::query(
            r#"
            DELETE FROM comments
            WHERE task_id IN (SELECT id FROM tasks WHERE board_id = $1)
            "#,
        )
        .bind(id)
        .execute(&mut *conn)
        .await?;

        sqlx::query("DELETE FROM tasks WHERE board_id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        sqlx::query("DELETE FROM board_members WHERE board_id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        let result = sqlx::query("DELETE FROM boards WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
