//! Repository for the `tasks` table.

use bcpms_core::stages::{TaskPriority, TaskStatus};
use bcpms_core::types::DbId;
use sqlx::PgPool;

use crate::models::task::{CreateTaskDto, Task, UpdateTaskDto};

const COLUMNS: &str = "id, project_id, title, description, status, priority, due_date, \
                       assignee, created_at, updated_at";

/// Provides CRUD and project-link operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a task. `status` defaults to `todo`, `priority` to `medium`.
    pub async fn create(
        pool: &PgPool,
        id: DbId,
        project_id: Option<DbId>,
        input: &CreateTaskDto,
    ) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (id, project_id, title, description, status, priority, due_date, assignee)
             VALUES ($1, $2, $3, $4, COALESCE($5, 'todo'), COALESCE($6, 'medium'), $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(project_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status.map(TaskStatus::as_str))
            .bind(input.priority.map(TaskPriority::as_str))
            .bind(input.due_date)
            .bind(&input.assignee)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List tasks, optionally filtered by project and status. Tasks with a
    /// due date come first, soonest first.
    pub async fn list(
        pool: &PgPool,
        project_id: Option<DbId>,
        status: Option<TaskStatus>,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE ($1::UUID IS NULL OR project_id = $1)
               AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY due_date ASC NULLS LAST, created_at DESC"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .bind(status.map(TaskStatus::as_str))
            .fetch_all(pool)
            .await
    }

    /// Update a task. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTaskDto,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                status = COALESCE($4, status),
                priority = COALESCE($5, priority),
                due_date = COALESCE($6, due_date),
                assignee = COALESCE($7, assignee),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status.map(TaskStatus::as_str))
            .bind(input.priority.map(TaskPriority::as_str))
            .bind(input.due_date)
            .bind(&input.assignee)
            .fetch_optional(pool)
            .await
    }

    /// Link an unlinked task to `project_id`.
    ///
    /// Also succeeds (as a no-op) when the task is already linked there.
    /// Returns `None` when the task is missing or linked elsewhere.
    pub async fn connect(
        pool: &PgPool,
        task_id: DbId,
        project_id: DbId,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET project_id = $2, updated_at = NOW()
             WHERE id = $1 AND (project_id IS NULL OR project_id = $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(task_id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Clear the link between a task and `project_id`.
    ///
    /// Returns `None` when the task is missing or not linked there.
    pub async fn disconnect(
        pool: &PgPool,
        task_id: DbId,
        project_id: DbId,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET project_id = NULL, updated_at = NOW()
             WHERE id = $1 AND project_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(task_id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Point a task at `project_id` regardless of its current link.
    pub async fn relink(
        pool: &PgPool,
        task_id: DbId,
        project_id: DbId,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET project_id = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(task_id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a task. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
