use bcpms_core::error::CoreError;
use bcpms_core::stages::{LinkMode, TaskStatus};
use bcpms_core::types::{new_id, parse_id, parse_optional_id, DbId};
use bcpms_db::models::task::{CreateTaskDto, LinkTaskDto, Task, UpdateTaskDto};
use bcpms_db::repositories::{ProjectRepo, TaskRepo};
use bcpms_db::Database;

use crate::error::{AppError, AppResult};

/// Task CRUD and explicit project linking.
#[derive(Clone)]
pub struct TaskService {
    db: Database,
}

impl TaskService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list(&self, project_id: Option<DbId>, status: Option<TaskStatus>) -> AppResult<Vec<Task>> {
        Ok(TaskRepo::list(self.db.pool(), project_id, status).await?)
    }

    pub async fn create(&self, input: CreateTaskDto) -> AppResult<Task> {
        let project_id = parse_optional_id("projectId", input.project_id.as_deref())?;
        if let Some(project_id) = project_id {
            self.require_project(project_id).await?;
        }
        let task = TaskRepo::create(self.db.pool(), new_id(), project_id, &input).await?;
        tracing::info!(task_id = %task.id, project_id = ?task.project_id, "Task created");
        Ok(task)
    }

    pub async fn get(&self, id: DbId) -> AppResult<Task> {
        TaskRepo::find_by_id(self.db.pool(), id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn update(&self, id: DbId, input: UpdateTaskDto) -> AppResult<Task> {
        let task = TaskRepo::update(self.db.pool(), id, &input)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!(task_id = %id, status = %task.status, "Task updated");
        Ok(task)
    }

    pub async fn delete(&self, id: DbId) -> AppResult<()> {
        if !TaskRepo::delete(self.db.pool(), id).await? {
            return Err(not_found(id));
        }
        tracing::info!(task_id = %id, "Task deleted");
        Ok(())
    }

    /// Apply a link request against `project_id`.
    ///
    /// No action relinks the task to the project whatever its current link.
    /// `connect` refuses to steal a task from another project and is a no-op
    /// when the task is already here. `disconnect` refuses when the task is
    /// not linked here.
    pub async fn link(&self, project_id: DbId, input: LinkTaskDto) -> AppResult<Task> {
        let task_id = parse_id("taskId", &input.task_id)?;
        let mode = LinkMode::from(input.action);
        self.require_project(project_id).await?;

        let pool = self.db.pool();
        let updated = match mode {
            LinkMode::Connect => TaskRepo::connect(pool, task_id, project_id).await?,
            LinkMode::Disconnect => TaskRepo::disconnect(pool, task_id, project_id).await?,
            LinkMode::Relink => TaskRepo::relink(pool, task_id, project_id).await?,
        };

        match updated {
            Some(task) => {
                tracing::info!(task_id = %task_id, project_id = %project_id, ?mode, "Task link updated");
                Ok(task)
            }
            None => {
                // Either the task is gone or the conditional update refused.
                let current = self.get(task_id).await?;
                Err(CoreError::Conflict(match mode {
                    LinkMode::Disconnect => format!("Task {task_id} is not linked to project {project_id}"),
                    _ => format!(
                        "Task {task_id} is already linked to project {}",
                        current
                            .project_id
                            .map_or_else(|| "none".to_string(), |p| p.to_string())
                    ),
                })
                .into())
            }
        }
    }

    async fn require_project(&self, project_id: DbId) -> AppResult<()> {
        ProjectRepo::find_by_id(self.db.pool(), project_id)
            .await?
            .map(|_| ())
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Project",
                id: project_id,
            }))
    }
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Task", id })
}
