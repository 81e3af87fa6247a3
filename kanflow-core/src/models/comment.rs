/// Comment model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE comments (
///     id         BLOB PRIMARY KEY,
///     task_id    BLOB NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     author_id  BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     content    TEXT NOT NULL,
///     created_at TEXT NOT NULL
/// );
/// ```
///
/// The author is set at creation and immutable; only the author may delete
/// a comment (enforced by the authorization engine, not here).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use uuid::Uuid;

/// Comment entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub task_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Read view of a comment: the author appears by display name only
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommentView {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,

    /// Author's full name (not the whole profile)
    pub author: String,

    pub content: String,
}

impl Comment {
    /// Creates a comment on a task
    ///
    /// Caller has already trimmed and validated the content.
    pub async fn create(
        conn: &mut SqliteConnection,
        task_id: Uuid,
        author_id: Uuid,
        content: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (id, task_id, author_id, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, task_id, author_id, content, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(task_id)
        .bind(author_id)
        .bind(content)
        .bind(Utc::now())
        .fetch_one(conn)
        .await
    }

    /// Finds a comment by ID, scoped to its task
    pub async fn find_in_task(
        conn: &mut SqliteConnection,
        task_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, task_id, author_id, content, created_at
            FROM comments
            WHERE id = $1 AND task_id = $2
            "#,
        )
        .bind(comment_id)
        .bind(task_id)
        .fetch_optional(conn)
        .await
    }

    /// Deletes a comment
    pub async fn delete(conn: &mut SqliteConnection, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Views of all comments on a task, oldest first
    pub async fn views_for_task(
        conn: &mut SqliteConnection,
        task_id: Uuid,
    ) -> Result<Vec<CommentView>, sqlx::Error> {
        sqlx::query_as::<_, CommentView>(
            r#"
            SELECT c.id, c.created_at, u.fullname AS author, c.content
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.task_id = $1
            ORDER BY c.created_at ASC, c.id ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(conn)
        .await
    }
}
