//! Declarative per-field constraints evaluated over a raw JSON object.
//!
//! Pure logic, no I/O. A [`Schema`] walks its rules in declaration order,
//! applies the sanitize step where declared, and collects every violation
//! instead of stopping at the first.

use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};

use super::{FieldError, FieldErrors};
use crate::sanitize::sanitize;

/// What to do with keys the schema does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownFieldPolicy {
    /// Drop undeclared keys silently.
    #[default]
    Strip,
    /// Report each undeclared key as a violation.
    Reject,
}

/// A single constraint on a present, non-null field value.
#[derive(Debug, Clone)]
pub enum Constraint {
    IsString,
    IsIn(&'static [&'static str]),
    IsUuid,
    /// RFC 3339 timestamp.
    IsDateTime,
    /// `YYYY-MM-DD`.
    IsDate,
    IsNumber,
    IsBoolean,
    IsStringArray,
    /// Maximum length in characters.
    MaxLength(usize),
    /// Domain-specific string check, e.g. a recurrence rule.
    Custom {
        name: &'static str,
        check: fn(&str) -> Result<(), String>,
    },
}

impl Constraint {
    fn name(&self) -> &'static str {
        match self {
            Self::IsString => "isString",
            Self::IsIn(_) => "isIn",
            Self::IsUuid => "isUuid",
            Self::IsDateTime => "isDateString",
            Self::IsDate => "isDate",
            Self::IsNumber => "isNumber",
            Self::IsBoolean => "isBoolean",
            Self::IsStringArray => "isArray",
            Self::MaxLength(_) => "maxLength",
            Self::Custom { name, .. } => *name,
        }
    }

    /// Returns the violation message, or `None` when `value` satisfies it.
    fn check(&self, field: &str, value: &Value) -> Option<String> {
        match self {
            Self::IsString => (!value.is_string()).then(|| format!("{field} must be a string")),
            Self::IsIn(allowed) => match value.as_str() {
                Some(s) if allowed.contains(&s) => None,
                _ => Some(format!(
                    "{field} must be one of the following values: {}",
                    allowed.join(", ")
                )),
            },
            Self::IsUuid => match value.as_str().map(uuid::Uuid::parse_str) {
                Some(Ok(_)) => None,
                _ => Some(format!("{field} must be a UUID")),
            },
            Self::IsDateTime => match value.as_str().map(DateTime::parse_from_rfc3339) {
                Some(Ok(_)) => None,
                _ => Some(format!("{field} must be a valid ISO 8601 date string")),
            },
            Self::IsDate => match value
                .as_str()
                .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
            {
                Some(Ok(_)) => None,
                _ => Some(format!("{field} must be a date in YYYY-MM-DD format")),
            },
            Self::IsNumber => match value.as_f64() {
                Some(n) if n.is_finite() => None,
                _ => Some(format!("{field} must be a number")),
            },
            Self::IsBoolean => (!value.is_boolean()).then(|| format!("{field} must be a boolean")),
            Self::IsStringArray => match value.as_array() {
                Some(items) if items.iter().all(Value::is_string) => None,
                _ => Some(format!("{field} must be an array of strings")),
            },
            // Non-strings are the type check's business.
            Self::MaxLength(max) => match value.as_str() {
                Some(s) if s.chars().count() > *max => Some(format!(
                    "{field} must be shorter than or equal to {max} characters"
                )),
                _ => None,
            },
            Self::Custom { check, .. } => match value.as_str() {
                Some(s) => check(s).err().map(|reason| format!("{field} {reason}")),
                None => None,
            },
        }
    }
}

/// Presence, optional sanitize step, and constraints for one field.
#[derive(Debug, Clone)]
pub struct FieldRule {
    name: &'static str,
    required: bool,
    sanitized: bool,
    constraints: Vec<Constraint>,
}

impl FieldRule {
    /// A field that must be present and non-null.
    pub fn required(name: &'static str) -> Self {
        Self {
            name,
            required: true,
            sanitized: false,
            constraints: Vec::new(),
        }
    }

    /// A field that may be absent or null; constraints apply only when present.
    pub fn optional(name: &'static str) -> Self {
        Self {
            required: false,
            ..Self::required(name)
        }
    }

    /// Run the sanitizer over string values before any constraint.
    pub fn sanitized(mut self) -> Self {
        self.sanitized = true;
        self
    }

    pub fn with(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn string(self) -> Self {
        self.with(Constraint::IsString)
    }

    pub fn one_of(self, allowed: &'static [&'static str]) -> Self {
        self.with(Constraint::IsIn(allowed))
    }

    pub fn max_length(self, max: usize) -> Self {
        self.with(Constraint::MaxLength(max))
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn evaluate(&self, object: &mut Map<String, Value>, errors: &mut Vec<FieldError>) {
        if self.sanitized {
            if let Some(Value::String(raw)) = object.get_mut(self.name) {
                *raw = sanitize(raw);
            }
        }

        let value = match object.get(self.name) {
            None | Some(Value::Null) => {
                if self.required {
                    errors.push(FieldError {
                        field: self.name.to_string(),
                        constraint: "isDefined".to_string(),
                        message: format!("{} should not be null or undefined", self.name),
                    });
                    // Mirror the type constraints so clients see what was expected.
                    for constraint in &self.constraints {
                        if let Some(message) = constraint.check(self.name, &Value::Null) {
                            errors.push(FieldError {
                                field: self.name.to_string(),
                                constraint: constraint.name().to_string(),
                                message,
                            });
                        }
                    }
                }
                return;
            }
            Some(value) => value,
        };

        for constraint in &self.constraints {
            if let Some(message) = constraint.check(self.name, value) {
                errors.push(FieldError {
                    field: self.name.to_string(),
                    constraint: constraint.name().to_string(),
                    message,
                });
            }
        }
    }
}

/// Ordered set of field rules for one DTO.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldRule>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, rule: FieldRule) -> Self {
        self.fields.push(rule);
        self
    }

    pub fn fields(&self) -> &[FieldRule] {
        &self.fields
    }

    /// Sanitize, check and filter `object` in place.
    ///
    /// On success `object` holds only declared keys (under
    /// [`UnknownFieldPolicy::Strip`]) with sanitized values. On failure every
    /// violation is returned.
    pub fn apply(
        &self,
        object: &mut Map<String, Value>,
        policy: UnknownFieldPolicy,
    ) -> Result<(), FieldErrors> {
        let mut errors = Vec::new();

        for rule in &self.fields {
            rule.evaluate(object, &mut errors);
        }

        let unknown: Vec<String> = object
            .keys()
            .filter(|key| !self.fields.iter().any(|rule| rule.name == key.as_str()))
            .cloned()
            .collect();
        match policy {
            UnknownFieldPolicy::Strip => {
                for key in &unknown {
                    object.remove(key);
                }
            }
            UnknownFieldPolicy::Reject => {
                errors.extend(unknown.into_iter().map(|key| FieldError {
                    message: format!("property {key} should not exist"),
                    field: key,
                    constraint: "whitelist".to_string(),
                }));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(FieldErrors(errors))
        }
    }
}
