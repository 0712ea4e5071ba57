use bcpms_core::error::CoreError;
use bcpms_core::types::{new_id, parse_optional_id, DbId, Timestamp};
use bcpms_core::validation::{FieldError, FieldErrors};
use bcpms_db::models::calendar_event::{CalendarEvent, CreateEventDto, UpdateEventDto};
use bcpms_db::repositories::{CalendarEventRepo, ProjectRepo};
use bcpms_db::Database;
use chrono::Duration;

use super::rrule::{Occurrence, RRuleService};
use crate::error::{AppError, AppResult};

/// Window used by the occurrence listing when `to` is omitted.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Longest window a single occurrence query may span.
pub const MAX_WINDOW_DAYS: i64 = 366;

#[derive(Clone)]
pub struct CalendarService {
    db: Database,
    rrule: RRuleService,
}

impl CalendarService {
    pub fn new(db: Database, rrule: RRuleService) -> Self {
        Self { db, rrule }
    }

    pub async fn list(&self, project_id: Option<DbId>) -> AppResult<Vec<CalendarEvent>> {
        Ok(CalendarEventRepo::list(self.db.pool(), project_id).await?)
    }

    pub async fn create(&self, input: CreateEventDto) -> AppResult<CalendarEvent> {
        check_order(input.starts_at, input.ends_at)?;
        let project_id = parse_optional_id("projectId", input.project_id.as_deref())?;
        if let Some(project_id) = project_id {
            ProjectRepo::find_by_id(self.db.pool(), project_id)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "Project",
                    id: project_id,
                })?;
        }

        let event = CalendarEventRepo::create(self.db.pool(), new_id(), project_id, &input).await?;
        tracing::info!(event_id = %event.id, recurring = event.rrule.is_some(), "Calendar event created");
        Ok(event)
    }

    pub async fn get(&self, id: DbId) -> AppResult<CalendarEvent> {
        CalendarEventRepo::find_by_id(self.db.pool(), id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Apply a partial update; the resulting start/end pair must still be
    /// ordered.
    pub async fn update(&self, id: DbId, input: UpdateEventDto) -> AppResult<CalendarEvent> {
        let current = self.get(id).await?;
        check_order(
            input.starts_at.unwrap_or(current.starts_at),
            input.ends_at.unwrap_or(current.ends_at),
        )?;

        let event = CalendarEventRepo::update(self.db.pool(), id, &input)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!(event_id = %id, "Calendar event updated");
        Ok(event)
    }

    pub async fn delete(&self, id: DbId) -> AppResult<()> {
        if !CalendarEventRepo::delete(self.db.pool(), id).await? {
            return Err(not_found(id));
        }
        tracing::info!(event_id = %id, "Calendar event deleted");
        Ok(())
    }

    /// Expanded occurrences starting in `[from, to)`.
    ///
    /// `from` defaults to now and `to` to [`DEFAULT_WINDOW_DAYS`] after
    /// `from`.
    pub async fn occurrences(
        &self,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
        project_id: Option<DbId>,
    ) -> AppResult<Vec<Occurrence>> {
        let (from, to) = resolve_window(from, to, chrono::Utc::now())?;
        let events = CalendarEventRepo::list_candidates(self.db.pool(), from, to, project_id).await?;
        Ok(self.rrule.expand_events(&events, from, to))
    }
}

fn resolve_window(
    from: Option<Timestamp>,
    to: Option<Timestamp>,
    now: Timestamp,
) -> Result<(Timestamp, Timestamp), CoreError> {
    let from = from.unwrap_or(now);
    let to = to.unwrap_or(from + Duration::days(DEFAULT_WINDOW_DAYS));
    if to <= from {
        return Err(CoreError::Validation(
            "Occurrence window must end after it starts".to_string(),
        ));
    }
    if to - from > Duration::days(MAX_WINDOW_DAYS) {
        return Err(CoreError::Validation(format!(
            "Occurrence window may span at most {MAX_WINDOW_DAYS} days"
        )));
    }
    Ok((from, to))
}

fn check_order(starts_at: Timestamp, ends_at: Timestamp) -> Result<(), CoreError> {
    if ends_at < starts_at {
        return Err(CoreError::InvalidFields(FieldErrors(vec![FieldError {
            field: "endsAt".to_string(),
            constraint: "isAfterStart".to_string(),
            message: "endsAt must not be earlier than startsAt".to_string(),
        }])));
    }
    Ok(())
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "CalendarEvent",
        id,
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    use super::*;

    fn at(d: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn window_defaults_to_thirty_days_from_now() {
        let now = at(1);
        let (from, to) = resolve_window(None, None, now).unwrap();
        assert_eq!(from, now);
        assert_eq!(to - from, Duration::days(DEFAULT_WINDOW_DAYS));
    }

    #[test]
    fn inverted_or_oversized_window_is_rejected() {
        assert_matches!(
            resolve_window(Some(at(5)), Some(at(5)), at(1)),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            resolve_window(Some(at(1)), Some(at(1) + Duration::days(400)), at(1)),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn end_before_start_is_a_field_error() {
        let err = check_order(at(2), at(1)).unwrap_err();
        let CoreError::InvalidFields(errors) = err else {
            panic!("expected field errors, got {err:?}");
        };
        assert_eq!(errors.fields(), vec!["endsAt"]);
        assert!(check_order(at(1), at(1)).is_ok());
    }
}
