//! Repository for the `calendar_events` table.

use bcpms_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::calendar_event::{CalendarEvent, CreateEventDto, UpdateEventDto};

const COLUMNS: &str = "id, project_id, title, description, starts_at, ends_at, all_day, \
                       rrule, exdates, created_at, updated_at";

pub struct CalendarEventRepo;

impl CalendarEventRepo {
    pub async fn create(
        pool: &PgPool,
        id: DbId,
        project_id: Option<DbId>,
        input: &CreateEventDto,
    ) -> Result<CalendarEvent, sqlx::Error> {
        let query = format!(
            "INSERT INTO calendar_events
                (id, project_id, title, description, starts_at, ends_at, all_day, rrule, exdates)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, FALSE), $8, COALESCE($9, '{{}}'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CalendarEvent>(&query)
            .bind(id)
            .bind(project_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(input.all_day)
            .bind(&input.rrule)
            .bind(&input.exdates)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CalendarEvent>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM calendar_events WHERE id = $1");
        sqlx::query_as::<_, CalendarEvent>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List events by start time, optionally for one project.
    pub async fn list(
        pool: &PgPool,
        project_id: Option<DbId>,
    ) -> Result<Vec<CalendarEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM calendar_events
             WHERE ($1::UUID IS NULL OR project_id = $1)
             ORDER BY starts_at ASC"
        );
        sqlx::query_as::<_, CalendarEvent>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Events that may have an occurrence starting in `[from, to)`: every
    /// recurring series that started before `to`, plus single events whose
    /// start falls in the window.
    pub async fn list_candidates(
        pool: &PgPool,
        from: Timestamp,
        to: Timestamp,
        project_id: Option<DbId>,
    ) -> Result<Vec<CalendarEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM calendar_events
             WHERE starts_at < $2
               AND (rrule IS NOT NULL OR starts_at >= $1)
               AND ($3::UUID IS NULL OR project_id = $3)
             ORDER BY starts_at ASC"
        );
        sqlx::query_as::<_, CalendarEvent>(&query)
            .bind(from)
            .bind(to)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update an event. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEventDto,
    ) -> Result<Option<CalendarEvent>, sqlx::Error> {
        let query = format!(
            "UPDATE calendar_events SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                starts_at = COALESCE($4, starts_at),
                ends_at = COALESCE($5, ends_at),
                all_day = COALESCE($6, all_day),
                rrule = COALESCE($7, rrule),
                exdates = COALESCE($8, exdates),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CalendarEvent>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(input.all_day)
            .bind(&input.rrule)
            .bind(&input.exdates)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM calendar_events WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
