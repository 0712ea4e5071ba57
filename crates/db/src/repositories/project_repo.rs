//! Repository for the `projects` table.
//!
//! Pipeline entries and delivery projects share the table; `converted_at`
//! tells them apart.

use bcpms_core::stages::ProjectStage;
use bcpms_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{
    CreatePipelineEntryDto, CreateProjectDto, Project, UpdateProjectDto,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, client_name, stage, estimated_value, \
                       converted_at, deleted_at, created_at, updated_at";

/// Provides CRUD and lifecycle operations for projects and pipeline entries.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a delivery project. `stage` defaults to `planning`.
    pub async fn create(
        pool: &PgPool,
        id: DbId,
        input: &CreateProjectDto,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (id, name, description, client_name, stage, estimated_value, converted_at)
             VALUES ($1, $2, $3, $4, COALESCE($5, 'planning'), $6, NOW())
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.client_name)
            .bind(input.stage.map(ProjectStage::as_str))
            .bind(input.estimated_value)
            .fetch_one(pool)
            .await
    }

    /// Insert a sales-pipeline entry. `stage` defaults to `lead`.
    pub async fn create_pipeline_entry(
        pool: &PgPool,
        id: DbId,
        input: &CreatePipelineEntryDto,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (id, name, description, client_name, stage, estimated_value)
             VALUES ($1, $2, $3, $4, COALESCE($5, 'lead'), $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.client_name)
            .bind(input.stage.map(ProjectStage::as_str))
            .bind(input.estimated_value)
            .fetch_one(pool)
            .await
    }

    /// Find a project or pipeline entry by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List converted projects or pipeline entries, newest first, optionally
    /// filtered by stage. Excludes soft-deleted rows.
    pub async fn list(
        pool: &PgPool,
        converted: bool,
        stage: Option<ProjectStage>,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE deleted_at IS NULL
               AND (converted_at IS NOT NULL) = $1
               AND ($2::TEXT IS NULL OR stage = $2)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(converted)
            .bind(stage.map(ProjectStage::as_str))
            .fetch_all(pool)
            .await
    }

    /// Update descriptive fields. Only non-`None` fields in `input` are
    /// applied; `stage` is ignored here and moves through [`Self::move_stage`]
    /// or [`Self::update_with_stage`].
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProjectDto,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                client_name = COALESCE($4, client_name),
                estimated_value = COALESCE($5, estimated_value),
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.client_name)
            .bind(input.estimated_value)
            .fetch_optional(pool)
            .await
    }

    /// Update descriptive fields and move the stage from `from` to `to` in
    /// one transaction.
    ///
    /// Returns `None` and writes nothing if the row is missing or is no
    /// longer in `from`.
    pub async fn update_with_stage(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProjectDto,
        from: ProjectStage,
        to: ProjectStage,
    ) -> Result<Option<Project>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let moved = sqlx::query(
            "UPDATE projects SET stage = $3
             WHERE id = $1 AND stage = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .execute(&mut *tx)
        .await?;
        if moved.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                client_name = COALESCE($4, client_name),
                estimated_value = COALESCE($5, estimated_value),
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.client_name)
            .bind(input.estimated_value)
            .fetch_optional(&mut *tx)
            .await?;

        match updated {
            Some(project) => {
                tx.commit().await?;
                Ok(Some(project))
            }
            None => {
                tx.rollback().await?;
                Ok(None)
            }
        }
    }

    /// Move a row from `from` to `to`.
    ///
    /// The update only applies while the row is still in `from`, so a
    /// concurrent move makes this return `None`.
    pub async fn move_stage(
        pool: &PgPool,
        id: DbId,
        from: ProjectStage,
        to: ProjectStage,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET stage = $3, updated_at = NOW()
             WHERE id = $1 AND stage = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Convert a pipeline entry into a delivery project.
    ///
    /// Runs in a single transaction: the entry moves to the initial delivery
    /// stage and every brief attached to it is re-pointed from `pipeline_id`
    /// to `project_id`. Returns `None` (and writes nothing) if the row is
    /// missing, already converted, or lost.
    pub async fn convert(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE projects SET stage = $2, converted_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND converted_at IS NULL AND stage <> $3 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let converted = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(ProjectStage::initial_delivery().as_str())
            .bind(ProjectStage::Lost.as_str())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(project) = converted else {
            tx.rollback().await?;
            return Ok(None);
        };

        let moved = sqlx::query(
            "UPDATE strategic_briefs SET project_id = pipeline_id, pipeline_id = NULL, updated_at = NOW()
             WHERE pipeline_id = $1",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::debug!(project_id = %id, briefs = moved.rows_affected(), "Pipeline briefs re-pointed");
        Ok(Some(project))
    }

    /// Soft-delete a row by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
