//! Integration tests for task CRUD and explicit project links.
//!
//! Need a live database (`DATABASE_URL`); run with `cargo test -- --ignored`.

use bcpms_core::stages::TaskStatus;
use bcpms_core::types::new_id;
use bcpms_db::models::project::CreateProjectDto;
use bcpms_db::models::task::{CreateTaskDto, UpdateTaskDto};
use bcpms_db::repositories::{ProjectRepo, TaskRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn project(pool: &PgPool, name: &str) -> uuid::Uuid {
    let input = CreateProjectDto {
        name: name.to_string(),
        description: None,
        client_name: None,
        stage: None,
        estimated_value: None,
    };
    ProjectRepo::create(pool, new_id(), &input).await.unwrap().id
}

async fn task(pool: &PgPool, project_id: Option<uuid::Uuid>) -> uuid::Uuid {
    let input = CreateTaskDto {
        title: "Draft copy".to_string(),
        description: None,
        project_id: None,
        status: None,
        priority: None,
        due_date: None,
        assignee: None,
    };
    TaskRepo::create(pool, new_id(), project_id, &input).await.unwrap().id
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn connect_is_strict_and_idempotent(pool: PgPool) {
    let a = project(&pool, "A").await;
    let b = project(&pool, "B").await;
    let t = task(&pool, None).await;

    let linked = TaskRepo::connect(&pool, t, a).await.unwrap().unwrap();
    assert_eq!(linked.project_id, Some(a));
    assert!(TaskRepo::connect(&pool, t, a).await.unwrap().is_some());
    assert!(TaskRepo::connect(&pool, t, b).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn disconnect_requires_current_link(pool: PgPool) {
    let a = project(&pool, "A").await;
    let b = project(&pool, "B").await;
    let t = task(&pool, Some(a)).await;

    assert!(TaskRepo::disconnect(&pool, t, b).await.unwrap().is_none());
    let unlinked = TaskRepo::disconnect(&pool, t, a).await.unwrap().unwrap();
    assert_eq!(unlinked.project_id, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn relink_moves_task_between_projects(pool: PgPool) {
    let a = project(&pool, "A").await;
    let b = project(&pool, "B").await;
    let t = task(&pool, Some(a)).await;

    let moved = TaskRepo::relink(&pool, t, b).await.unwrap().unwrap();
    assert_eq!(moved.project_id, Some(b));
    assert!(TaskRepo::list(&pool, Some(a), None).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn update_keeps_link_and_filters_by_status(pool: PgPool) {
    let a = project(&pool, "A").await;
    let t = task(&pool, Some(a)).await;

    let done = TaskRepo::update(
        &pool,
        t,
        &UpdateTaskDto {
            status: Some(TaskStatus::Done),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(done.status, "done");
    assert_eq!(done.project_id, Some(a));

    let open = TaskRepo::list(&pool, None, Some(TaskStatus::Todo)).await.unwrap();
    assert!(open.iter().all(|task| task.id != t));

    assert!(TaskRepo::delete(&pool, t).await.unwrap());
    assert!(TaskRepo::find_by_id(&pool, t).await.unwrap().is_none());
}
