//! Repository for the `weekly_notes` table.

use bcpms_core::types::DbId;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::weekly_note::WeeklyNote;

const COLUMNS: &str = "id, project_id, week_start, note, created_at";

pub struct WeeklyNoteRepo;

impl WeeklyNoteRepo {
    /// Insert a note. `note` must already be sanitized; `week_start` must be
    /// a Monday.
    pub async fn create(
        pool: &PgPool,
        id: DbId,
        project_id: DbId,
        week_start: NaiveDate,
        note: &str,
    ) -> Result<WeeklyNote, sqlx::Error> {
        let query = format!(
            "INSERT INTO weekly_notes (id, project_id, week_start, note)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WeeklyNote>(&query)
            .bind(id)
            .bind(project_id)
            .bind(week_start)
            .bind(note)
            .fetch_one(pool)
            .await
    }

    /// Timeline for a project: latest week first, then newest note first.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<WeeklyNote>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM weekly_notes
             WHERE project_id = $1
             ORDER BY week_start DESC, created_at DESC"
        );
        sqlx::query_as::<_, WeeklyNote>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}
