use crate::error::CoreError;
use crate::validation::{FieldError, FieldErrors};

/// All database primary keys are UUIDs (v7, generated by the service).
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh, time-ordered primary key.
pub fn new_id() -> DbId {
    uuid::Uuid::now_v7()
}

/// Monday of the ISO week containing `date`.
pub fn week_start_of(date: chrono::NaiveDate) -> chrono::NaiveDate {
    use chrono::Datelike;
    date - chrono::Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Parse a wire-format identifier, reporting the offending field on failure.
///
/// DTO id fields travel as plain strings; the service layer is where they
/// become typed keys.
pub fn parse_id(field: &'static str, raw: &str) -> Result<DbId, CoreError> {
    uuid::Uuid::parse_str(raw.trim()).map_err(|_| {
        CoreError::InvalidFields(FieldErrors(vec![FieldError {
            field: field.to_string(),
            constraint: "isUuid".to_string(),
            message: format!("{field} must be a valid identifier"),
        }]))
    })
}

/// [`parse_id`] for an optional wire id.
pub fn parse_optional_id(field: &'static str, raw: Option<&str>) -> Result<Option<DbId>, CoreError> {
    raw.map(|r| parse_id(field, r)).transpose()
}
