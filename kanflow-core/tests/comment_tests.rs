/// Integration tests for comments: access scoping, ordering, counts, and
/// the author-only delete rule

mod common;

use common::{register_user, setup_pool};
use kanflow_core::error::CoreError;
use kanflow_core::models::task::{CreateTask, TaskPriority, TaskStatus};
use kanflow_core::ops::{boards, comments, tasks};
use sqlx::SqlitePool;
use uuid::Uuid;

async fn board_and_task(pool: &SqlitePool, owner: Uuid, member: Uuid) -> Uuid {
    let board = boards::create_board(pool, owner, "Sprint 1", &[member])
        .await
        .expect("board creation failed");

    tasks::create_task(
        pool,
        owner,
        CreateTask {
            board_id: board.id,
            title: "Write tests".to_string(),
            description: String::new(),
            status: TaskStatus::ToDo,
            priority: TaskPriority::Medium,
            assignee_id: None,
            reviewer_id: None,
            due_date: None,
        },
    )
    .await
    .expect("task creation failed")
    .id
}

#[tokio::test]
async fn test_create_and_list_comments_oldest_first() {
    let pool = setup_pool().await;
    let alice = register_user(&pool, "Alice", "alice@example.com").await;
    let bob = register_user(&pool, "Bob", "bob@example.com").await;
    let task_id = board_and_task(&pool, alice.user.id, bob.user.id).await;

    let first = comments::create_comment(&pool, alice.user.id, task_id, "First!")
        .await
        .expect("comment creation failed");
    assert_eq!(first.author, "Alice");
    assert_eq!(first.content, "First!");

    comments::create_comment(&pool, bob.user.id, task_id, "Second.")
        .await
        .unwrap();

    let listed = comments::list_comments(&pool, bob.user.id, task_id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].content, "First!");
    assert_eq!(listed[1].content, "Second.");
}

#[tokio::test]
async fn test_comment_count_reflected_in_task_view() {
    let pool = setup_pool().await;
    let alice = register_user(&pool, "Alice", "alice@example.com").await;
    let bob = register_user(&pool, "Bob", "bob@example.com").await;
    let task_id = board_and_task(&pool, alice.user.id, bob.user.id).await;

    comments::create_comment(&pool, alice.user.id, task_id, "one").await.unwrap();
    comments::create_comment(&pool, bob.user.id, task_id, "two").await.unwrap();

    let assigned = tasks::update_task(&pool, alice.user.id, task_id, Default::default())
        .await
        .unwrap();
    assert_eq!(assigned.comments_count, 2);
}

#[tokio::test]
async fn test_comment_rejects_blank_content() {
    let pool = setup_pool().await;
    let alice = register_user(&pool, "Alice", "alice@example.com").await;
    let bob = register_user(&pool, "Bob", "bob@example.com").await;
    let task_id = board_and_task(&pool, alice.user.id, bob.user.id).await;

    let result = comments::create_comment(&pool, alice.user.id, task_id, "   \n").await;
    assert!(matches!(result, Err(CoreError::Validation(_))));
}

#[tokio::test]
async fn test_comments_hidden_from_outsiders() {
    let pool = setup_pool().await;
    let alice = register_user(&pool, "Alice", "alice@example.com").await;
    let bob = register_user(&pool, "Bob", "bob@example.com").await;
    let dana = register_user(&pool, "Dana", "dana@example.com").await;
    let task_id = board_and_task(&pool, alice.user.id, bob.user.id).await;

    let result = comments::list_comments(&pool, dana.user.id, task_id).await;
    assert!(matches!(result, Err(CoreError::NotFound(_))));

    let result = comments::create_comment(&pool, dana.user.id, task_id, "hi").await;
    assert!(matches!(result, Err(CoreError::NotFound(_))));

    let result = comments::list_comments(&pool, dana.user.id, Uuid::new_v4()).await;
    assert!(matches!(result, Err(CoreError::NotFound(_))));
}

#[tokio::test]
async fn test_delete_comment_author_only() {
    let pool = setup_pool().await;
    let alice = register_user(&pool, "Alice", "alice@example.com").await;
    let bob = register_user(&pool, "Bob", "bob@example.com").await;
    let task_id = board_and_task(&pool, alice.user.id, bob.user.id).await;

    let comment = comments::create_comment(&pool, bob.user.id, task_id, "mine")
        .await
        .unwrap();

    // Even the board owner cannot delete someone else's comment.
    let result = comments::delete_comment(&pool, alice.user.id, task_id, comment.id).await;
    assert!(matches!(result, Err(CoreError::Forbidden(_))));

    comments::delete_comment(&pool, bob.user.id, task_id, comment.id)
        .await
        .expect("author delete failed");

    let listed = comments::list_comments(&pool, bob.user.id, task_id)
        .await
        .unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_delete_missing_comment_is_not_found() {
    let pool = setup_pool().await;
    let alice = register_user(&pool, "Alice", "alice@example.com").await;
    let bob = register_user(&pool, "Bob", "bob@example.com").await;
    let task_id = board_and_task(&pool, alice.user.id, bob.user.id).await;

    let result = comments::delete_comment(&pool, alice.user.id, task_id, Uuid::new_v4()).await;
    assert!(matches!(result, Err(CoreError::NotFound(_))));
}

#[tokio::test]
async fn test_task_delete_removes_its_comments() {
    let pool = setup_pool().await;
    let alice = register_user(&pool, "Alice", "alice@example.com").await;
    let bob = register_user(&pool, "Bob", "bob@example.com").await;
    let task_id = board_and_task(&pool, alice.user.id, bob.user.id).await;

    comments::create_comment(&pool, bob.user.id, task_id, "soon gone")
        .await
        .unwrap();

    tasks::delete_task(&pool, alice.user.id, task_id).await.unwrap();

    let result = comments::list_comments(&pool, bob.user.id, task_id).await;
    assert!(matches!(result, Err(CoreError::NotFound(_))));
}
