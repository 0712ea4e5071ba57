//! Read-only aggregate queries behind the report and dashboard endpoints.
//!
//! Soft-deleted projects are excluded everywhere. Missing buckets are not
//! zero-filled here; see [`crate::models::report::fill_buckets`].

use bcpms_core::types::DbId;
use sqlx::PgPool;

use crate::models::report::{BucketCount, StageCount};

/// Tasks whose project (if any) is not soft-deleted.
const LIVE_TASKS: &str = "tasks t LEFT JOIN projects p ON p.id = t.project_id \
                          WHERE (t.project_id IS NULL OR p.deleted_at IS NULL)";

pub struct ReportRepo;

impl ReportRepo {
    /// Project count and summed estimated value per stage.
    ///
    /// `converted` selects delivery projects (`Some(true)`), pipeline entries
    /// (`Some(false)`), or both (`None`).
    pub async fn stage_counts(
        pool: &PgPool,
        converted: Option<bool>,
    ) -> Result<Vec<StageCount>, sqlx::Error> {
        sqlx::query_as::<_, StageCount>(
            "SELECT stage, COUNT(*) AS count, COALESCE(SUM(estimated_value), 0)::DOUBLE PRECISION AS total_value
             FROM projects
             WHERE deleted_at IS NULL
               AND ($1::BOOLEAN IS NULL OR (converted_at IS NOT NULL) = $1)
             GROUP BY stage
             ORDER BY stage",
        )
        .bind(converted)
        .fetch_all(pool)
        .await
    }

    /// Task count per status, optionally for one project.
    pub async fn task_status_counts(
        pool: &PgPool,
        project_id: Option<DbId>,
    ) -> Result<Vec<BucketCount>, sqlx::Error> {
        let query = format!(
            "SELECT t.status AS key, COUNT(*) AS count FROM {LIVE_TASKS}
               AND ($1::UUID IS NULL OR t.project_id = $1)
             GROUP BY t.status"
        );
        sqlx::query_as::<_, BucketCount>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Task count per priority, optionally for one project.
    pub async fn task_priority_counts(
        pool: &PgPool,
        project_id: Option<DbId>,
    ) -> Result<Vec<BucketCount>, sqlx::Error> {
        let query = format!(
            "SELECT t.priority AS key, COUNT(*) AS count FROM {LIVE_TASKS}
               AND ($1::UUID IS NULL OR t.project_id = $1)
             GROUP BY t.priority"
        );
        sqlx::query_as::<_, BucketCount>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Open tasks whose due date has passed.
    pub async fn overdue_task_count(
        pool: &PgPool,
        project_id: Option<DbId>,
    ) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM {LIVE_TASKS}
               AND t.status <> 'done'
               AND t.due_date < NOW()
               AND ($1::UUID IS NULL OR t.project_id = $1)"
        );
        let (count,): (i64,) = sqlx::query_as(&query)
            .bind(project_id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
