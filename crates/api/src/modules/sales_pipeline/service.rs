use bcpms_core::error::CoreError;
use bcpms_core::stages::{validate_conversion, ProjectStage};
use bcpms_core::types::{new_id, DbId};
use bcpms_db::models::project::{CreatePipelineEntryDto, Project};
use bcpms_db::models::weekly_note::{AddWeeklyNoteDto, WeeklyNote};
use bcpms_db::repositories::ProjectRepo;
use bcpms_db::Database;

use crate::error::{AppError, AppResult};
use crate::modules::project::ProjectService;

#[derive(Clone)]
pub struct PipelineService {
    db: Database,
    projects: ProjectService,
}

impl PipelineService {
    pub fn new(db: Database, projects: ProjectService) -> Self {
        Self { db, projects }
    }

    /// Unconverted entries, newest first.
    pub async fn list(&self, stage: Option<ProjectStage>) -> AppResult<Vec<Project>> {
        Ok(ProjectRepo::list(self.db.pool(), false, stage).await?)
    }

    pub async fn create(&self, input: CreatePipelineEntryDto) -> AppResult<Project> {
        let entry = ProjectRepo::create_pipeline_entry(self.db.pool(), new_id(), &input).await?;
        tracing::info!(entry_id = %entry.id, stage = %entry.stage, "Pipeline entry created");
        Ok(entry)
    }

    /// A live, unconverted entry. Converted rows are served by `/projects`.
    pub async fn get(&self, id: DbId) -> AppResult<Project> {
        match ProjectRepo::find_by_id(self.db.pool(), id).await? {
            Some(entry) if !entry.is_converted() => Ok(entry),
            _ => Err(not_found(id)),
        }
    }

    pub async fn move_stage(&self, id: DbId, stage: ProjectStage) -> AppResult<Project> {
        let entry = self.get(id).await?;
        self.projects.change_stage(&entry, stage).await
    }

    /// Turn a pipeline entry into a delivery project.
    ///
    /// The entry lands in `planning` and its briefs move from the pipeline id
    /// to the project id in the same transaction.
    pub async fn convert(&self, id: DbId) -> AppResult<Project> {
        let entry = self.get(id).await?;
        validate_conversion(entry.stage()?, entry.is_converted())?;

        let project = ProjectRepo::convert(self.db.pool(), id).await?.ok_or_else(|| {
            CoreError::Conflict(format!(
                "Pipeline entry {id} was converted or lost concurrently"
            ))
        })?;
        tracing::info!(project_id = %id, from = %entry.stage, "Pipeline entry converted");
        Ok(project)
    }

    pub async fn weekly_notes(&self, id: DbId) -> AppResult<Vec<WeeklyNote>> {
        self.get(id).await?;
        self.projects.weekly_notes(id).await
    }

    pub async fn add_weekly_note(&self, id: DbId, input: AddWeeklyNoteDto) -> AppResult<WeeklyNote> {
        self.get(id).await?;
        self.projects.add_weekly_note(id, input).await
    }
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "PipelineEntry",
        id,
    })
}
