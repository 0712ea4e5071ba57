//! Repository for `strategic_briefs` and `brief_revisions`.

use bcpms_core::stages::BriefStatus;
use bcpms_core::types::DbId;
use sqlx::PgPool;

use crate::models::brief::{BriefParent, BriefRevision, CreateBriefDto, StrategicBrief, UpdateBriefDto};

const COLUMNS: &str = "id, pipeline_id, project_id, title, objectives, target_audience, \
                       key_messages, status, created_at, updated_at";

const REVISION_COLUMNS: &str = "id, brief_id, comment, created_at";

pub struct BriefRepo;

impl BriefRepo {
    /// Insert a draft brief under `parent`.
    ///
    /// The parent check and the insert share one transaction; the parent row
    /// is share-locked so it cannot be converted or deleted in between.
    /// Returns `None` (nothing written) when the parent is missing or is not
    /// of the expected kind.
    pub async fn create(
        pool: &PgPool,
        id: DbId,
        parent: BriefParent,
        input: &CreateBriefDto,
    ) -> Result<Option<StrategicBrief>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // (pipeline_id, project_id, parent row that must exist and whether it
        // must be converted)
        let (pipeline_id, project_id, required) = match parent {
            BriefParent::Pipeline(pid) => (Some(pid), None, Some((pid, false))),
            BriefParent::Project(pid) => (None, Some(pid), Some((pid, true))),
            BriefParent::Unattached => (None, None, None),
        };

        if let Some((parent_id, converted)) = required {
            let exists: Option<(DbId,)> = sqlx::query_as(
                "SELECT id FROM projects
                 WHERE id = $1 AND deleted_at IS NULL AND (converted_at IS NOT NULL) = $2
                 FOR SHARE",
            )
            .bind(parent_id)
            .bind(converted)
            .fetch_optional(&mut *tx)
            .await?;
            if exists.is_none() {
                tx.rollback().await?;
                return Ok(None);
            }
        }

        let query = format!(
            "INSERT INTO strategic_briefs
                (id, pipeline_id, project_id, title, objectives, target_audience, key_messages)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let brief = sqlx::query_as::<_, StrategicBrief>(&query)
            .bind(id)
            .bind(pipeline_id)
            .bind(project_id)
            .bind(&input.title)
            .bind(&input.objectives)
            .bind(&input.target_audience)
            .bind(&input.key_messages)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(brief))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<StrategicBrief>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM strategic_briefs WHERE id = $1");
        sqlx::query_as::<_, StrategicBrief>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List briefs, newest first, optionally filtered by parent.
    pub async fn list(
        pool: &PgPool,
        project_id: Option<DbId>,
        pipeline_id: Option<DbId>,
    ) -> Result<Vec<StrategicBrief>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM strategic_briefs
             WHERE ($1::UUID IS NULL OR project_id = $1)
               AND ($2::UUID IS NULL OR pipeline_id = $2)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, StrategicBrief>(&query)
            .bind(project_id)
            .bind(pipeline_id)
            .fetch_all(pool)
            .await
    }

    /// Revision requests for a brief, oldest first.
    pub async fn list_revisions(
        pool: &PgPool,
        brief_id: DbId,
    ) -> Result<Vec<BriefRevision>, sqlx::Error> {
        let query = format!(
            "SELECT {REVISION_COLUMNS} FROM brief_revisions WHERE brief_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, BriefRevision>(&query)
            .bind(brief_id)
            .fetch_all(pool)
            .await
    }

    /// Update content fields of a brief that is not yet approved.
    ///
    /// Returns `None` if the brief is missing or approved.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBriefDto,
    ) -> Result<Option<StrategicBrief>, sqlx::Error> {
        let query = format!(
            "UPDATE strategic_briefs SET
                title = COALESCE($2, title),
                objectives = COALESCE($3, objectives),
                target_audience = COALESCE($4, target_audience),
                key_messages = COALESCE($5, key_messages),
                updated_at = NOW()
             WHERE id = $1 AND status <> $6
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StrategicBrief>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.objectives)
            .bind(&input.target_audience)
            .bind(&input.key_messages)
            .bind(BriefStatus::Approved.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Move a brief from `from` to `to`. Returns `None` if it is no longer in
    /// `from`.
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        from: BriefStatus,
        to: BriefStatus,
    ) -> Result<Option<StrategicBrief>, sqlx::Error> {
        let query = format!(
            "UPDATE strategic_briefs SET status = $3, updated_at = NOW()
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StrategicBrief>(&query)
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Send a submitted brief back for revision and record `comment`, in one
    /// transaction. Returns `None` if the brief is no longer submitted.
    pub async fn request_revision(
        pool: &PgPool,
        id: DbId,
        revision_id: DbId,
        comment: &str,
    ) -> Result<Option<StrategicBrief>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE strategic_briefs SET status = $3, updated_at = NOW()
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, StrategicBrief>(&query)
            .bind(id)
            .bind(BriefStatus::Submitted.as_str())
            .bind(BriefStatus::RevisionRequested.as_str())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(brief) = updated else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query("INSERT INTO brief_revisions (id, brief_id, comment) VALUES ($1, $2, $3)")
            .bind(revision_id)
            .bind(id)
            .bind(comment)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(brief))
    }
}
