use bcpms_core::error::CoreError;
use bcpms_core::stages::{validate_stage_transition, ProjectStage};
use bcpms_core::types::{new_id, week_start_of, DbId};
use bcpms_db::models::project::{CreateProjectDto, Project, UpdateProjectDto};
use bcpms_db::models::task::{LinkTaskDto, Task};
use bcpms_db::models::weekly_note::{AddWeeklyNoteDto, WeeklyNote};
use bcpms_db::repositories::{ProjectRepo, WeeklyNoteRepo};
use bcpms_db::Database;

use crate::error::{AppError, AppResult};
use crate::modules::task::TaskService;

/// Projects (and, through shared methods, pipeline entries): CRUD, stage
/// moves, task links and weekly notes.
#[derive(Clone)]
pub struct ProjectService {
    db: Database,
    tasks: TaskService,
}

impl ProjectService {
    pub fn new(db: Database, tasks: TaskService) -> Self {
        Self { db, tasks }
    }

    /// Converted projects, newest first.
    pub async fn list(&self, stage: Option<ProjectStage>) -> AppResult<Vec<Project>> {
        Ok(ProjectRepo::list(self.db.pool(), true, stage).await?)
    }

    pub async fn create(&self, input: CreateProjectDto) -> AppResult<Project> {
        let project = ProjectRepo::create(self.db.pool(), new_id(), &input).await?;
        tracing::info!(project_id = %project.id, stage = %project.stage, "Project created");
        Ok(project)
    }

    /// Any live row, pipeline entry or project.
    pub async fn get(&self, id: DbId) -> AppResult<Project> {
        ProjectRepo::find_by_id(self.db.pool(), id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Field edits and a stage move in one request are applied together or
    /// not at all.
    pub async fn update(&self, id: DbId, input: UpdateProjectDto) -> AppResult<Project> {
        let current = self.get(id).await?;
        let stage_move = match input.stage {
            Some(to) => check_stage_move(&current, to)?,
            None => None,
        };
        let updated = match stage_move {
            Some((from, to)) => {
                let updated = ProjectRepo::update_with_stage(self.db.pool(), id, &input, from, to)
                    .await?
                    .ok_or_else(|| concurrent_change(id))?;
                tracing::info!(project_id = %id, %from, %to, "Project stage changed");
                updated
            }
            None => ProjectRepo::update(self.db.pool(), id, &input)
                .await?
                .ok_or_else(|| not_found(id))?,
        };
        Ok(updated)
    }

    pub async fn delete(&self, id: DbId) -> AppResult<()> {
        if !ProjectRepo::soft_delete(self.db.pool(), id).await? {
            return Err(not_found(id));
        }
        tracing::info!(project_id = %id, "Project soft-deleted");
        Ok(())
    }

    /// Move `project` to `to` under the pipeline/delivery transition rules.
    pub async fn change_stage(&self, project: &Project, to: ProjectStage) -> AppResult<Project> {
        let Some((from, to)) = check_stage_move(project, to)? else {
            return Ok(project.clone());
        };
        let moved = ProjectRepo::move_stage(self.db.pool(), project.id, from, to)
            .await?
            .ok_or_else(|| concurrent_change(project.id))?;
        tracing::info!(project_id = %project.id, %from, %to, "Project stage changed");
        Ok(moved)
    }

    pub async fn tasks(&self, id: DbId) -> AppResult<Vec<Task>> {
        self.get(id).await?;
        self.tasks.list(Some(id), None).await
    }

    pub async fn link_task(&self, id: DbId, input: LinkTaskDto) -> AppResult<Task> {
        self.tasks.link(id, input).await
    }

    pub async fn weekly_notes(&self, id: DbId) -> AppResult<Vec<WeeklyNote>> {
        self.get(id).await?;
        Ok(WeeklyNoteRepo::list_for_project(self.db.pool(), id).await?)
    }

    /// Add a note to the week containing `weekStart` (default: today).
    pub async fn add_weekly_note(&self, id: DbId, input: AddWeeklyNoteDto) -> AppResult<WeeklyNote> {
        self.get(id).await?;
        let week_start = week_start_of(
            input
                .week_start
                .unwrap_or_else(|| chrono::Utc::now().date_naive()),
        );
        let note = WeeklyNoteRepo::create(self.db.pool(), new_id(), id, week_start, &input.note).await?;
        tracing::info!(project_id = %id, note_id = %note.id, %week_start, "Weekly note added");
        Ok(note)
    }
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Project",
        id,
    })
}

fn concurrent_change(id: DbId) -> AppError {
    AppError::Core(CoreError::Conflict(format!(
        "Project {id} changed stage concurrently; reload and retry"
    )))
}

/// The `(from, to)` pair to apply, or `None` when `project` is already in
/// `to`.
fn check_stage_move(
    project: &Project,
    to: ProjectStage,
) -> Result<Option<(ProjectStage, ProjectStage)>, CoreError> {
    let from = project.stage()?;
    if from == to {
        return Ok(None);
    }
    validate_stage_transition(from, to, project.is_converted())?;
    Ok(Some((from, to)))
}
