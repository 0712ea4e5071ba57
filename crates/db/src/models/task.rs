//! Task entity model and DTOs.

use std::sync::LazyLock;

use bcpms_core::error::CoreError;
use bcpms_core::stages::{
    LinkAction, TaskPriority, TaskStatus, LINK_ACTIONS, TASK_PRIORITIES, TASK_STATUSES,
};
use bcpms_core::types::{DbId, Timestamp};
use bcpms_core::validation::{Constraint, Dto, FieldRule, Schema};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: DbId,
    pub project_id: Option<DbId>,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub due_date: Option<Timestamp>,
    pub assignee: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Task {
    pub fn status(&self) -> Result<TaskStatus, CoreError> {
        TaskStatus::parse(&self.status)
    }
}

/// DTO for creating a task, optionally already linked to a project.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskDto {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub title: String,
    pub description: Option<String>,
    pub project_id: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<Timestamp>,
    pub assignee: Option<String>,
}

static CREATE_TASK_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .field(FieldRule::required("title").sanitized().string().max_length(300))
        .field(FieldRule::optional("description").sanitized().string().max_length(5000))
        .field(FieldRule::optional("projectId").string())
        .field(FieldRule::optional("status").string().one_of(TASK_STATUSES))
        .field(FieldRule::optional("priority").string().one_of(TASK_PRIORITIES))
        .field(FieldRule::optional("dueDate").with(Constraint::IsDateTime))
        .field(FieldRule::optional("assignee").sanitized().string().max_length(200))
});

impl Dto for CreateTaskDto {
    fn schema() -> &'static Schema {
        &CREATE_TASK_SCHEMA
    }
}

/// DTO for updating a task. All fields are optional.
///
/// The project link is not editable here; it moves only through
/// [`LinkTaskDto`].
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskDto {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<Timestamp>,
    pub assignee: Option<String>,
}

static UPDATE_TASK_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .field(FieldRule::optional("title").sanitized().string().max_length(300))
        .field(FieldRule::optional("description").sanitized().string().max_length(5000))
        .field(FieldRule::optional("status").string().one_of(TASK_STATUSES))
        .field(FieldRule::optional("priority").string().one_of(TASK_PRIORITIES))
        .field(FieldRule::optional("dueDate").with(Constraint::IsDateTime))
        .field(FieldRule::optional("assignee").sanitized().string().max_length(200))
});

impl Dto for UpdateTaskDto {
    fn schema() -> &'static Schema {
        &UPDATE_TASK_SCHEMA
    }
}

/// DTO for linking a task to, or unlinking it from, a project.
///
/// Without `action` the task is relinked to the target project whatever its
/// current link.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LinkTaskDto {
    pub task_id: String,
    pub action: Option<LinkAction>,
}

static LINK_TASK_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .field(FieldRule::required("taskId").string())
        .field(FieldRule::optional("action").string().one_of(LINK_ACTIONS))
});

impl Dto for LinkTaskDto {
    fn schema() -> &'static Schema {
        &LINK_TASK_SCHEMA
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use bcpms_core::validation::{validate_payload, UnknownFieldPolicy};
    use serde_json::json;

    use super::*;

    fn link(body: serde_json::Value) -> Result<LinkTaskDto, CoreError> {
        validate_payload(body, UnknownFieldPolicy::Strip)
    }

    #[test]
    fn link_requires_task_id() {
        let err = link(json!({ "action": "connect" })).unwrap_err();
        let CoreError::InvalidFields(errors) = err else {
            panic!("expected field errors");
        };
        assert_eq!(errors.fields(), vec!["taskId"]);
        assert!(errors.0.iter().any(|e| e.constraint == "isDefined"));
    }

    #[test]
    fn link_rejects_unknown_action() {
        let err = link(json!({ "taskId": "t-1", "action": "move" })).unwrap_err();
        assert_matches!(err, CoreError::InvalidFields(ref e) if e.fields() == vec!["action"]);
    }

    #[test]
    fn link_accepts_absent_action() {
        let dto = link(json!({ "taskId": "t-1" })).unwrap();
        assert_eq!(dto.task_id, "t-1");
        assert_eq!(dto.action, None);
    }

    #[test]
    fn link_accepts_both_actions() {
        assert_eq!(
            link(json!({ "taskId": "t-1", "action": "connect" })).unwrap().action,
            Some(LinkAction::Connect)
        );
        assert_eq!(
            link(json!({ "taskId": "t-1", "action": "disconnect" })).unwrap().action,
            Some(LinkAction::Disconnect)
        );
    }

    #[test]
    fn create_task_reports_every_bad_field() {
        let err = validate_payload::<CreateTaskDto>(
            json!({ "status": "blocked", "priority": 3, "dueDate": "tomorrow" }),
            UnknownFieldPolicy::Strip,
        )
        .unwrap_err();
        let CoreError::InvalidFields(errors) = err else {
            panic!("expected field errors");
        };
        assert_eq!(errors.fields(), vec!["title", "status", "priority", "dueDate"]);
    }

    #[test]
    fn update_task_ignores_project_id() {
        let dto: UpdateTaskDto = validate_payload(
            json!({ "status": "done", "projectId": "elsewhere" }),
            UnknownFieldPolicy::Strip,
        )
        .unwrap();
        assert_eq!(dto.status, Some(TaskStatus::Done));
    }
}
