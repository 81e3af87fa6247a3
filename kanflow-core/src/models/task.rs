/// Task model, status/priority enums, and user-centric task views
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id          BLOB PRIMARY KEY,
///     board_id    BLOB NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
///     title       TEXT NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     status      TEXT NOT NULL DEFAULT 'to-do',
///     priority    TEXT NOT NULL DEFAULT 'medium',
///     assignee_id BLOB REFERENCES users(id) ON DELETE SET NULL,
///     reviewer_id BLOB REFERENCES users(id) ON DELETE SET NULL,
///     due_date    TEXT,
///     created_at  TEXT NOT NULL,
///     updated_at  TEXT NOT NULL
/// );
/// ```
///
/// A task's board is fixed at creation and never reassigned. Assignee and
/// reviewer must hold board access when they are *set*; a later membership
/// removal leaves the reference in place (stale, surfaced on read).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use uuid::Uuid;

use super::user::UserPublic;
use crate::error::CoreError;

/// Task workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    ToDo,
    InProgress,
    Review,
    Done,
}

impl TaskStatus {
    /// Wire/storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::ToDo => "to-do",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Review => "review",
            TaskStatus::Done => "done",
        }
    }

    /// Parses the wire representation, rejecting unknown values
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "to-do" => Ok(TaskStatus::ToDo),
            "in-progress" => Ok(TaskStatus::InProgress),
            "review" => Ok(TaskStatus::Review),
            "done" => Ok(TaskStatus::Done),
            other => Err(CoreError::Validation(format!(
                "invalid status '{}': expected one of to-do, in-progress, review, done",
                other
            ))),
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    /// Wire/storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }

    /// Parses the wire representation, rejecting unknown values
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(CoreError::Validation(format!(
                "invalid priority '{}': expected one of low, medium, high",
                other
            ))),
        }
    }
}

/// Task entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: Uuid,

    /// Parent board, fixed at creation
    pub board_id: Uuid,

    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,

    /// User responsible for performing the task
    pub assignee_id: Option<Uuid>,

    /// User responsible for reviewing the task
    pub reviewer_id: Option<Uuid>,

    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task
///
/// Caller has already verified that assignee/reviewer hold board access.
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub board_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assignee_id: Option<Uuid>,
    pub reviewer_id: Option<Uuid>,
    pub due_date: Option<NaiveDate>,
}

/// Partial task update
///
/// Outer `Option` = "was the field present in the patch"; for clearable
/// columns an inner `Option` distinguishes "set to value" from "set to
/// null".
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assignee_id: Option<Option<Uuid>>,
    pub reviewer_id: Option<Option<Uuid>>,
    pub due_date: Option<Option<NaiveDate>>,
}

/// Read view of a task with nested user profiles and comment count
///
/// `assignee`/`reviewer` are resolved against the users table, not the
/// member set, so a stale reference still renders instead of vanishing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskView {
    pub id: Uuid,
    pub board: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assignee: Option<UserPublic>,
    pub reviewer: Option<UserPublic>,
    pub due_date: Option<NaiveDate>,
    pub comments_count: i64,
}

/// Flat row shape backing [`TaskView`]
#[derive(sqlx::FromRow)]
struct TaskViewRow {
    id: Uuid,
    board_id: Uuid,
    title: String,
    description: String,
    status: TaskStatus,
    priority: TaskPriority,
    assignee_id: Option<Uuid>,
    assignee_email: Option<String>,
    assignee_fullname: Option<String>,
    reviewer_id: Option<Uuid>,
    reviewer_email: Option<String>,
    reviewer_fullname: Option<String>,
    due_date: Option<NaiveDate>,
    comments_count: i64,
}

impl From<TaskViewRow> for TaskView {
    fn from(row: TaskViewRow) -> Self {
        let assignee = match (row.assignee_id, row.assignee_email, row.assignee_fullname) {
            (Some(id), Some(email), Some(fullname)) => Some(UserPublic {
                id,
                email,
                fullname,
            }),
            _ => None,
        };
        let reviewer = match (row.reviewer_id, row.reviewer_email, row.reviewer_fullname) {
            (Some(id), Some(email), Some(fullname)) => Some(UserPublic {
                id,
                email,
                fullname,
            }),
            _ => None,
        };

        Self {
            id: row.id,
            board: row.board_id,
            title: row.title,
            description: row.description,
            status: row.status,
            priority: row.priority,
            assignee,
            reviewer,
            due_date: row.due_date,
            comments_count: row.comments_count,
        }
    }
}

/// Select list shared by the task view queries
const VIEW_COLUMNS: &str = r#"
    t.id,
    t.board_id,
    t.title,
    t.description,
    t.status,
    t.priority,
    a.id AS assignee_id,
    a.email AS assignee_email,
    a.fullname AS assignee_fullname,
    r.id AS reviewer_id,
    r.email AS reviewer_email,
    r.fullname AS reviewer_fullname,
    t.due_date,
    (SELECT COUNT(*) FROM comments c WHERE c.task_id = t.id) AS comments_count
"#;

const VIEW_JOINS: &str = r#"
    FROM tasks t
    LEFT JOIN users a ON a.id = t.assignee_id
    LEFT JOIN users r ON r.id = t.reviewer_id
"#;

impl Task {
    /// Creates a new task
    pub async fn create(conn: &mut SqliteConnection, data: CreateTask) -> Result<Self, sqlx::Error> {
        let now = Utc::now();

        sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (
                id, board_id, title, description, status, priority,
                assignee_id, reviewer_id, due_date, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, board_id, title, description, status, priority,
                      assignee_id, reviewer_id, due_date, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.board_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.priority)
        .bind(data.assignee_id)
        .bind(data.reviewer_id)
        .bind(data.due_date)
        .bind(now)
        .bind(now)
        .fetch_one(conn)
        .await
    }

    /// Finds a task by ID
    pub async fn find_by_id(
        conn: &mut SqliteConnection,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, board_id, title, description, status, priority,
                   assignee_id, reviewer_id, due_date, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    /// Applies a partial update; only present fields are written
    ///
    /// The board is deliberately not updatable. Builds the statement
    /// dynamically so absent fields are untouched rather than overwritten.
    pub async fn update(
        conn: &mut SqliteConnection,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE tasks SET updated_at = $2");
        let mut bind_count = 2;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }
        if data.assignee_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", assignee_id = ${}", bind_count));
        }
        if data.reviewer_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", reviewer_id = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, board_id, title, description, status, priority, \
             assignee_id, reviewer_id, due_date, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id).bind(Utc::now());

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(assignee_id) = data.assignee_id {
            q = q.bind(assignee_id);
        }
        if let Some(reviewer_id) = data.reviewer_id {
            q = q.bind(reviewer_id);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }

        q.fetch_optional(conn).await
    }

    /// Deletes the task and its comments; must run inside a transaction
    pub async fn delete_cascade(conn: &mut SqliteConnection, id: Uuid) -> Result<bool, sqlx::Error> {
        sqlx::query("DELETE FROM comments WHERE task_id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Loads the read view of a single task
    pub async fn view_by_id(
        conn: &mut SqliteConnection,
        id: Uuid,
    ) -> Result<Option<TaskView>, sqlx::Error> {
        let query = format!("SELECT {VIEW_COLUMNS} {VIEW_JOINS} WHERE t.id = $1");

        let row = sqlx::query_as::<_, TaskViewRow>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(row.map(TaskView::from))
    }

    /// Lists the views of all tasks on a board, stable by task id
    pub async fn views_for_board(
        conn: &mut SqliteConnection,
        board_id: Uuid,
    ) -> Result<Vec<TaskView>, sqlx::Error> {
        let query = format!("SELECT {VIEW_COLUMNS} {VIEW_JOINS} WHERE t.board_id = $1 ORDER BY t.id ASC");

        let rows = sqlx::query_as::<_, TaskViewRow>(&query)
            .bind(board_id)
            .fetch_all(conn)
            .await?;

        Ok(rows.into_iter().map(TaskView::from).collect())
    }

    /// All tasks across all boards where the user is the assignee
    ///
    /// Stable order by task id ascending.
    pub async fn views_assigned_to(
        conn: &mut SqliteConnection,
        user_id: Uuid,
    ) -> Result<Vec<TaskView>, sqlx::Error> {
        let query =
            format!("SELECT {VIEW_COLUMNS} {VIEW_JOINS} WHERE t.assignee_id = $1 ORDER BY t.id ASC");

        let rows = sqlx::query_as::<_, TaskViewRow>(&query)
            .bind(user_id)
            .fetch_all(conn)
            .await?;

        Ok(rows.into_iter().map(TaskView::from).collect())
    }

    /// All tasks across all boards where the user is the reviewer
    ///
    /// Stable order by task id ascending.
    pub async fn views_reviewed_by(
        conn: &mut SqliteConnection,
        user_id: Uuid,
    ) -> Result<Vec<TaskView>, sqlx::Error> {
        let query =
            format!("SELECT {VIEW_COLUMNS} {VIEW_JOINS} WHERE t.reviewer_id = $1 ORDER BY t.id ASC");

        let rows = sqlx::query_as::<_, TaskViewRow>(&query)
            .bind(user_id)
            .fetch_all(conn)
            .await?;

        Ok(rows.into_iter().map(TaskView::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            TaskStatus::ToDo,
            TaskStatus::InProgress,
            TaskStatus::Review,
            TaskStatus::Done,
        ] {
            assert_eq!(TaskStatus::parse(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn test_status_parse_rejects_unknown() {
        let err = TaskStatus::parse("doing").unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(err.to_string().contains("doing"));
    }

    #[test]
    fn test_priority_roundtrip() {
        for priority in [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High] {
            assert_eq!(TaskPriority::parse(priority.as_str()).unwrap(), priority);
        }
        assert!(TaskPriority::parse("urgent").is_err());
    }

    #[test]
    fn test_update_task_default_is_empty_patch() {
        let patch = UpdateTask::default();
        assert!(patch.title.is_none());
        assert!(patch.status.is_none());
        assert!(patch.assignee_id.is_none());
        assert!(patch.due_date.is_none());
    }

    // Database operations are covered in tests/task_tests.rs.
}
