//! Calendar event model and DTOs.

use std::sync::LazyLock;

use bcpms_core::rrule::check_rrule;
use bcpms_core::types::{DbId, Timestamp};
use bcpms_core::validation::{Constraint, Dto, FieldRule, Schema};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `calendar_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: DbId,
    pub project_id: Option<DbId>,
    pub title: String,
    pub description: Option<String>,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub all_day: bool,
    pub rrule: Option<String>,
    /// Occurrence start times removed from the series.
    pub exdates: Vec<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

fn rrule_rule(name: &'static str) -> FieldRule {
    FieldRule::optional(name).string().with(Constraint::Custom {
        name: "isRRule",
        check: check_rrule,
    })
}

/// DTO for creating an event.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventDto {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub title: String,
    pub description: Option<String>,
    pub project_id: Option<String>,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub all_day: Option<bool>,
    pub rrule: Option<String>,
    pub exdates: Option<Vec<Timestamp>>,
}

static CREATE_EVENT_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .field(FieldRule::required("title").sanitized().string().max_length(300))
        .field(FieldRule::optional("description").sanitized().string().max_length(5000))
        .field(FieldRule::optional("projectId").string())
        .field(FieldRule::required("startsAt").with(Constraint::IsDateTime))
        .field(FieldRule::required("endsAt").with(Constraint::IsDateTime))
        .field(FieldRule::optional("allDay").with(Constraint::IsBoolean))
        .field(rrule_rule("rrule"))
        .field(FieldRule::optional("exdates").with(Constraint::IsStringArray))
});

impl Dto for CreateEventDto {
    fn schema() -> &'static Schema {
        &CREATE_EVENT_SCHEMA
    }
}

/// DTO for updating an event. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventDto {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub all_day: Option<bool>,
    pub rrule: Option<String>,
    pub exdates: Option<Vec<Timestamp>>,
}

static UPDATE_EVENT_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .field(FieldRule::optional("title").sanitized().string().max_length(300))
        .field(FieldRule::optional("description").sanitized().string().max_length(5000))
        .field(FieldRule::optional("startsAt").with(Constraint::IsDateTime))
        .field(FieldRule::optional("endsAt").with(Constraint::IsDateTime))
        .field(FieldRule::optional("allDay").with(Constraint::IsBoolean))
        .field(rrule_rule("rrule"))
        .field(FieldRule::optional("exdates").with(Constraint::IsStringArray))
});

impl Dto for UpdateEventDto {
    fn schema() -> &'static Schema {
        &UPDATE_EVENT_SCHEMA
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use bcpms_core::error::CoreError;
    use bcpms_core::validation::{validate_payload, UnknownFieldPolicy};
    use serde_json::json;

    use super::*;

    #[test]
    fn create_event_decodes_timestamps_and_exdates() {
        let dto: CreateEventDto = validate_payload(
            json!({
                "title": "Standup",
                "startsAt": "2026-03-02T09:00:00Z",
                "endsAt": "2026-03-02T09:15:00Z",
                "rrule": "FREQ=WEEKLY;BYDAY=MO,WE,FR",
                "exdates": ["2026-03-04T09:00:00Z"]
            }),
            UnknownFieldPolicy::Strip,
        )
        .unwrap();
        assert_eq!(dto.exdates.as_ref().map(Vec::len), Some(1));
        assert_eq!(dto.all_day, None);
    }

    #[test]
    fn malformed_rrule_is_a_field_error() {
        let err = validate_payload::<CreateEventDto>(
            json!({
                "title": "Standup",
                "startsAt": "2026-03-02T09:00:00Z",
                "endsAt": "2026-03-02T09:15:00Z",
                "rrule": "FREQ=HOURLY"
            }),
            UnknownFieldPolicy::Strip,
        )
        .unwrap_err();
        let CoreError::InvalidFields(errors) = err else {
            panic!("expected field errors");
        };
        assert_eq!(errors.fields(), vec!["rrule"]);
        assert_eq!(errors.0[0].constraint, "isRRule");
    }

    #[test]
    fn create_event_requires_window() {
        assert_matches!(
            validate_payload::<CreateEventDto>(json!({ "title": "x" }), UnknownFieldPolicy::Strip),
            Err(CoreError::InvalidFields(ref e)) if e.fields() == vec!["startsAt", "endsAt"]
        );
    }
}
