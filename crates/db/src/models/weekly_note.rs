//! Weekly timeline notes on a project or pipeline entry.

use std::sync::LazyLock;

use bcpms_core::types::{DbId, Timestamp};
use bcpms_core::validation::{Constraint, Dto, FieldRule, Schema};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `weekly_notes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyNote {
    pub id: DbId,
    pub project_id: DbId,
    /// Always a Monday.
    pub week_start: NaiveDate,
    pub note: String,
    pub created_at: Timestamp,
}

/// DTO for adding a note. `weekStart` defaults to the current week and is
/// normalized to its Monday.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddWeeklyNoteDto {
    pub note: String,
    pub week_start: Option<NaiveDate>,
}

static ADD_WEEKLY_NOTE_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .field(FieldRule::required("note").sanitized().string())
        .field(FieldRule::optional("weekStart").with(Constraint::IsDate))
});

impl Dto for AddWeeklyNoteDto {
    fn schema() -> &'static Schema {
        &ADD_WEEKLY_NOTE_SCHEMA
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
    fn note_is_sanitized_before_the_string_check() {
        let dto: AddWeeklyNoteDto = validate_payload(
            json!({ "note": "<p>Kickoff went well</p>", "weekStart": "2026-03-04" }),
            UnknownFieldPolicy::Strip,
        )
        .unwrap();
        assert_eq!(dto.note, "Kickoff went well");
        assert_eq!(dto.week_start, NaiveDate::from_ymd_opt(2026, 3, 4));
    }

    #[test]
    fn missing_note_is_rejected() {
        let err = validate_payload::<AddWeeklyNoteDto>(json!({}), UnknownFieldPolicy::Strip)
            .unwrap_err();
        let CoreError::InvalidFields(errors) = err else {
            panic!("expected field errors");
        };
        let constraints: Vec<&str> = errors.0.iter().map(|e| e.constraint.as_str()).collect();
        assert_eq!(constraints, vec!["isDefined", "isString"]);
    }

    #[test]
    fn non_string_note_is_rejected() {
        assert_matches!(
            validate_payload::<AddWeeklyNoteDto>(json!({ "note": ["a"] }), UnknownFieldPolicy::Strip),
            Err(CoreError::InvalidFields(ref e)) if e.fields() == vec!["note"]
        );
    }

    #[test]
    fn malformed_week_start_is_rejected() {
        assert_matches!(
            validate_payload::<AddWeeklyNoteDto>(
                json!({ "note": "ok", "weekStart": "03/04/2026" }),
                UnknownFieldPolicy::Strip
            ),
            Err(CoreError::InvalidFields(ref e)) if e.fields() == vec!["weekStart"]
        );
    }
}
