/// Integration tests for task lifecycle, assignment rules, and the
/// cross-board assigned-to-me / reviewing queries

mod common;

use common::{register_user, setup_pool};
use chrono::NaiveDate;
use kanflow_core::error::CoreError;
use kanflow_core::models::task::{CreateTask, TaskPriority, TaskStatus, UpdateTask};
use kanflow_core::ops::{boards, tasks};
use sqlx::SqlitePool;
use uuid::Uuid;

fn new_task(board_id: Uuid, title: &str) -> CreateTask {
    CreateTask {
        board_id,
        title: title.to_string(),
        description: String::new(),
        status: TaskStatus::ToDo,
        priority: TaskPriority::Medium,
        assignee_id: None,
        reviewer_id: None,
        due_date: None,
    }
}

async fn board_with_member(pool: &SqlitePool, owner: Uuid, member: Uuid) -> Uuid {
    boards::create_board(pool, owner, "Sprint 1", &[member])
        .await
        .expect("board creation failed")
        .id
}

#[tokio::test]
async fn test_create_task_with_assignee_and_reviewer() {
    let pool = setup_pool().await;
    let alice = register_user(&pool, "Alice", "alice@example.com").await;
    let bob = register_user(&pool, "Bob", "bob@example.com").await;
    let board_id = board_with_member(&pool, alice.user.id, bob.user.id).await;

    let view = tasks::create_task(
        &pool,
        alice.user.id,
        CreateTask {
            assignee_id: Some(bob.user.id),
            reviewer_id: Some(alice.user.id),
            due_date: NaiveDate::from_ymd_opt(2026, 9, 15),
            priority: TaskPriority::High,
            ..new_task(board_id, "Write tests")
        },
    )
    .await
    .expect("task creation failed");

    assert_eq!(view.board, board_id);
    assert_eq!(view.title, "Write tests");
    assert_eq!(view.status, TaskStatus::ToDo);
    assert_eq!(view.priority, TaskPriority::High);
    assert_eq!(view.assignee.as_ref().map(|u| u.id), Some(bob.user.id));
    assert_eq!(view.reviewer.as_ref().map(|u| u.id), Some(alice.user.id));
    assert_eq!(view.due_date, NaiveDate::from_ymd_opt(2026, 9, 15));
    assert_eq!(view.comments_count, 0);
}

#[tokio::test]
async fn test_task_titles_are_stored_trimmed() {
    let pool = setup_pool().await;
    let alice = register_user(&pool, "Alice", "alice@example.com").await;
    let board_id = boards::create_board(&pool, alice.user.id, "Sprint 1", &[])
        .await
        .unwrap()
        .id;

    let view = tasks::create_task(&pool, alice.user.id, new_task(board_id, "  Write tests  "))
        .await
        .expect("task creation failed");
    assert_eq!(view.title, "Write tests");

    let view = tasks::update_task(
        &pool,
        alice.user.id,
        view.id,
        UpdateTask {
            title: Some("  Review tests ".to_string()),
            ..Default::default()
        },
    )
    .await
    .expect("update failed");
    assert_eq!(view.title, "Review tests");

    let result = tasks::update_task(
        &pool,
        alice.user.id,
        view.id,
        UpdateTask {
            title: Some("   ".to_string()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(result, Err(CoreError::Validation(_))));
}

#[tokio::test]
async fn test_create_task_requires_board_access() {
    let pool = setup_pool().await;
    let alice = register_user(&pool, "Alice", "alice@example.com").await;
    let dana = register_user(&pool, "Dana", "dana@example.com").await;
    let board_id = boards::create_board(&pool, alice.user.id, "Sprint 1", &[])
        .await
        .unwrap()
        .id;

    let result = tasks::create_task(&pool, dana.user.id, new_task(board_id, "sneaky")).await;
    assert!(matches!(result, Err(CoreError::NotFound(_))));

    let result = tasks::create_task(&pool, alice.user.id, new_task(Uuid::new_v4(), "orphan")).await;
    assert!(matches!(result, Err(CoreError::NotFound(_))));
}

#[tokio::test]
async fn test_create_task_rejects_non_member_assignee() {
    let pool = setup_pool().await;
    let alice = register_user(&pool, "Alice", "alice@example.com").await;
    let dana = register_user(&pool, "Dana", "dana@example.com").await;
    let board_id = boards::create_board(&pool, alice.user.id, "Sprint 1", &[])
        .await
        .unwrap()
        .id;

    let result = tasks::create_task(
        &pool,
        alice.user.id,
        CreateTask {
            assignee_id: Some(dana.user.id),
            ..new_task(board_id, "t")
        },
    )
    .await;
    assert!(matches!(result, Err(CoreError::Validation(_))));

    let result = tasks::create_task(
        &pool,
        alice.user.id,
        CreateTask {
            reviewer_id: Some(Uuid::new_v4()),
            ..new_task(board_id, "t")
        },
    )
    .await;
    assert!(matches!(result, Err(CoreError::Validation(_))));
}

#[tokio::test]
async fn test_update_task_patches_fields_and_clears_assignee() {
    let pool = setup_pool().await;
    let alice = register_user(&pool, "Alice", "alice@example.com").await;
    let bob = register_user(&pool, "Bob", "bob@example.com").await;
    let board_id = board_with_member(&pool, alice.user.id, bob.user.id).await;

    let created = tasks::create_task(
        &pool,
        alice.user.id,
        CreateTask {
            assignee_id: Some(bob.user.id),
            ..new_task(board_id, "Write tests")
        },
    )
    .await
    .unwrap();

    let view = tasks::update_task(
        &pool,
        bob.user.id,
        created.id,
        UpdateTask {
            status: Some(TaskStatus::InProgress),
            assignee_id: Some(None),
            ..Default::default()
        },
    )
    .await
    .expect("update failed");

    assert_eq!(view.status, TaskStatus::InProgress);
    assert!(view.assignee.is_none(), "assignee should be cleared");
    assert_eq!(view.title, "Write tests", "untouched fields survive");
}

#[tokio::test]
async fn test_update_task_validates_new_assignee_membership() {
    let pool = setup_pool().await;
    let alice = register_user(&pool, "Alice", "alice@example.com").await;
    let dana = register_user(&pool, "Dana", "dana@example.com").await;
    let board_id = boards::create_board(&pool, alice.user.id, "Sprint 1", &[])
        .await
        .unwrap()
        .id;

    let created = tasks::create_task(&pool, alice.user.id, new_task(board_id, "t"))
        .await
        .unwrap();

    let result = tasks::update_task(
        &pool,
        alice.user.id,
        created.id,
        UpdateTask {
            assignee_id: Some(Some(dana.user.id)),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(result, Err(CoreError::Validation(_))));
}

#[tokio::test]
async fn test_removed_member_leaves_stale_assignee() {
    let pool = setup_pool().await;
    let alice = register_user(&pool, "Alice", "alice@example.com").await;
    let bob = register_user(&pool, "Bob", "bob@example.com").await;
    let board_id = board_with_member(&pool, alice.user.id, bob.user.id).await;

    let created = tasks::create_task(
        &pool,
        alice.user.id,
        CreateTask {
            assignee_id: Some(bob.user.id),
            ..new_task(board_id, "t")
        },
    )
    .await
    .unwrap();

    boards::update_board(
        &pool,
        alice.user.id,
        board_id,
        boards::UpdateBoard {
            title: None,
            members: Some(vec![]),
        },
    )
    .await
    .unwrap();

    // Membership removal does not rewrite existing tasks.
    let detail = boards::get_board(&pool, alice.user.id, board_id).await.unwrap();
    assert_eq!(
        detail.tasks[0].assignee.as_ref().map(|u| u.id),
        Some(bob.user.id)
    );
    let _ = created;
}

#[tokio::test]
async fn test_delete_task_allowed_for_any_member() {
    let pool = setup_pool().await;
    let alice = register_user(&pool, "Alice", "alice@example.com").await;
    let bob = register_user(&pool, "Bob", "bob@example.com").await;
    let dana = register_user(&pool, "Dana", "dana@example.com").await;
    let board_id = board_with_member(&pool, alice.user.id, bob.user.id).await;

    let created = tasks::create_task(&pool, alice.user.id, new_task(board_id, "t"))
        .await
        .unwrap();

    let result = tasks::delete_task(&pool, dana.user.id, created.id).await;
    assert!(matches!(result, Err(CoreError::NotFound(_))));

    tasks::delete_task(&pool, bob.user.id, created.id)
        .await
        .expect("member should be able to delete");

    let result = tasks::delete_task(&pool, alice.user.id, created.id).await;
    assert!(matches!(result, Err(CoreError::NotFound(_))));
}

#[tokio::test]
async fn test_assigned_to_me_and_reviewing_queries() {
    let pool = setup_pool().await;
    let alice = register_user(&pool, "Alice", "alice@example.com").await;
    let bob = register_user(&pool, "Bob", "bob@example.com").await;
    let carol = register_user(&pool, "Carol", "carol@example.com").await;
    let board_id = boards::create_board(
        &pool,
        alice.user.id,
        "Sprint 1",
        &[bob.user.id, carol.user.id],
    )
    .await
    .unwrap()
    .id;

    let t1 = tasks::create_task(
        &pool,
        alice.user.id,
        CreateTask {
            assignee_id: Some(bob.user.id),
            reviewer_id: Some(carol.user.id),
            ..new_task(board_id, "t1")
        },
    )
    .await
    .unwrap();

    let assigned = tasks::assigned_to_me(&pool, bob.user.id).await.unwrap();
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0].id, t1.id);

    let reviewing = tasks::reviewing(&pool, carol.user.id).await.unwrap();
    assert_eq!(reviewing.len(), 1);
    assert_eq!(reviewing[0].id, t1.id);

    // The owner holds neither role on t1.
    assert!(tasks::assigned_to_me(&pool, alice.user.id).await.unwrap().is_empty());
    assert!(tasks::reviewing(&pool, alice.user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_status_and_priority_parse() {
    assert_eq!(TaskStatus::parse("in-progress").unwrap(), TaskStatus::InProgress);
    assert_eq!(TaskPriority::parse("high").unwrap(), TaskPriority::High);

    assert!(matches!(
        TaskStatus::parse("doing"),
        Err(CoreError::Validation(_))
    ));
    assert!(matches!(
        TaskPriority::parse("urgent"),
        Err(CoreError::Validation(_))
    ));
}
