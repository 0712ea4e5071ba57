//! Request-body validation.
//!
//! Every inbound DTO declares a [`Schema`]: per-field presence, sanitize step,
//! and constraints. [`validate_payload`] runs it over the raw JSON object,
//! decodes the typed struct, then runs the struct's derived `validator`
//! checks. Violations from either stage are reported as one [`FieldErrors`]
//! list, never just the first failure.

pub mod schema;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use validator::Validate;

use crate::error::CoreError;

pub use schema::{Constraint, FieldRule, Schema, UnknownFieldPolicy};

/// A single field-level violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Wire name of the offending field.
    pub field: String,
    /// Name of the failed constraint, e.g. `isString`.
    pub constraint: String,
    pub message: String,
}

/// Every violation found in one payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(pub Vec<FieldError>);

impl FieldErrors {
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = self.0.iter().map(|e| e.field.as_str()).collect();
        fields.dedup();
        fields
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut out: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let wire = to_camel_case(&field);
                errs.iter().map(move |err| FieldError {
                    field: wire.clone(),
                    constraint: err.code.to_string(),
                    message: err
                        .message
                        .as_ref()
                        .map(|m| format!("{wire} {m}"))
                        .unwrap_or_else(|| format!("{wire} is invalid ({})", err.code)),
                })
            })
            .collect();
        out.sort_by(|a, b| (&a.field, &a.constraint).cmp(&(&b.field, &b.constraint)));
        Self(out)
    }
}

/// Validator reports Rust field names; the wire uses camelCase.
fn to_camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for c in snake.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// A typed inbound payload with a declared schema.
pub trait Dto: DeserializeOwned + Validate {
    fn schema() -> &'static Schema;
}

/// Sanitize, check and decode `body` into `T`.
///
/// A body that is not a JSON object, or that passes the schema but still
/// fails to decode, is a plain [`CoreError::Validation`]. Field-level
/// violations are [`CoreError::InvalidFields`].
pub fn validate_payload<T: Dto>(body: Value, policy: UnknownFieldPolicy) -> Result<T, CoreError> {
    let Value::Object(mut object) = body else {
        return Err(CoreError::Validation(
            "Request body must be a JSON object".to_string(),
        ));
    };

    T::schema()
        .apply(&mut object, policy)
        .map_err(CoreError::InvalidFields)?;

    let dto: T = serde_json::from_value(Value::Object(object))
        .map_err(|e| CoreError::Validation(format!("Malformed request body: {e}")))?;

    dto.validate()
        .map_err(|e| CoreError::InvalidFields(FieldErrors::from(e)))?;

    Ok(dto)
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use assert_matches::assert_matches;
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    #[serde(rename_all = "camelCase")]
    struct Sample {
        #[validate(length(min = 1, message = "must not be empty"))]
        display_name: String,
        #[validate(range(min = 0))]
        seats: Option<i32>,
    }

    static SAMPLE_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
        Schema::new()
            .field(FieldRule::required("displayName").sanitized().string())
            .field(FieldRule::optional("seats").with(Constraint::IsNumber))
    });

    impl Dto for Sample {
        fn schema() -> &'static Schema {
            &SAMPLE_SCHEMA
        }
    }

    #[test]
    fn decodes_sanitized_payload() {
        let dto: Sample = validate_payload(
            json!({ "displayName": "<i>Ada</i>", "seats": 3, "ignored": true }),
            UnknownFieldPolicy::Strip,
        )
        .unwrap();
        assert_eq!(dto.display_name, "Ada");
        assert_eq!(dto.seats, Some(3));
    }

    #[test]
    fn non_object_body_is_rejected() {
        assert_matches!(
            validate_payload::<Sample>(json!([1, 2]), UnknownFieldPolicy::Strip),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn derived_checks_run_after_schema() {
        let err = validate_payload::<Sample>(
            json!({ "displayName": "<b></b>", "seats": -1 }),
            UnknownFieldPolicy::Strip,
        )
        .unwrap_err();
        let CoreError::InvalidFields(errors) = err else {
            panic!("expected field errors, got {err:?}");
        };
        assert_eq!(errors.fields(), vec!["displayName", "seats"]);
        assert_eq!(errors.0[0].message, "displayName must not be empty");
        assert_eq!(errors.0[1].constraint, "range");
    }

    #[test]
    fn camel_case_conversion() {
        assert_eq!(to_camel_case("target_audience"), "targetAudience");
        assert_eq!(to_camel_case("note"), "note");
    }
}
