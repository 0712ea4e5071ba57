//! Project entity model and DTOs.
//!
//! One table backs both sales-pipeline entries (`converted_at` unset) and
//! delivery projects.

use std::sync::LazyLock;

use bcpms_core::error::CoreError;
use bcpms_core::stages::{ProjectStage, DELIVERY_STAGES, PIPELINE_STAGES, PROJECT_STAGES};
use bcpms_core::types::{DbId, Timestamp};
use bcpms_core::validation::{Constraint, Dto, FieldRule, Schema};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub client_name: Option<String>,
    pub stage: String,
    pub estimated_value: Option<f64>,
    pub converted_at: Option<Timestamp>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    pub fn stage(&self) -> Result<ProjectStage, CoreError> {
        ProjectStage::parse(&self.stage)
    }

    /// `false` while the row is still a sales-pipeline entry.
    pub fn is_converted(&self) -> bool {
        self.converted_at.is_some()
    }
}

/// DTO for creating a delivery project directly.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectDto {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    pub description: Option<String>,
    pub client_name: Option<String>,
    /// Defaults to `planning`.
    pub stage: Option<ProjectStage>,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub estimated_value: Option<f64>,
}

static CREATE_PROJECT_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .field(FieldRule::required("name").sanitized().string().max_length(200))
        .field(FieldRule::optional("description").sanitized().string().max_length(5000))
        .field(FieldRule::optional("clientName").sanitized().string().max_length(200))
        .field(FieldRule::optional("stage").string().one_of(DELIVERY_STAGES))
        .field(FieldRule::optional("estimatedValue").with(Constraint::IsNumber))
});

impl Dto for CreateProjectDto {
    fn schema() -> &'static Schema {
        &CREATE_PROJECT_SCHEMA
    }
}

/// DTO for updating a project. All fields are optional.
///
/// A `stage` here goes through the same transition rules as the pipeline
/// stage endpoint.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectDto {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub client_name: Option<String>,
    pub stage: Option<ProjectStage>,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub estimated_value: Option<f64>,
}

static UPDATE_PROJECT_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .field(FieldRule::optional("name").sanitized().string().max_length(200))
        .field(FieldRule::optional("description").sanitized().string().max_length(5000))
        .field(FieldRule::optional("clientName").sanitized().string().max_length(200))
        .field(FieldRule::optional("stage").string().one_of(PROJECT_STAGES))
        .field(FieldRule::optional("estimatedValue").with(Constraint::IsNumber))
});

impl Dto for UpdateProjectDto {
    fn schema() -> &'static Schema {
        &UPDATE_PROJECT_SCHEMA
    }
}

/// DTO for adding a lead to the sales pipeline.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePipelineEntryDto {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    pub description: Option<String>,
    pub client_name: Option<String>,
    /// Defaults to `lead`.
    pub stage: Option<ProjectStage>,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub estimated_value: Option<f64>,
}

static CREATE_PIPELINE_ENTRY_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .field(FieldRule::required("name").sanitized().string().max_length(200))
        .field(FieldRule::optional("description").sanitized().string().max_length(5000))
        .field(FieldRule::optional("clientName").sanitized().string().max_length(200))
        .field(FieldRule::optional("stage").string().one_of(PIPELINE_STAGES))
        .field(FieldRule::optional("estimatedValue").with(Constraint::IsNumber))
});

impl Dto for CreatePipelineEntryDto {
    fn schema() -> &'static Schema {
        &CREATE_PIPELINE_ENTRY_SCHEMA
    }
}

/// DTO for moving a pipeline entry between stages.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStageDto {
    pub stage: ProjectStage,
}

static UPDATE_STAGE_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new().field(FieldRule::required("stage").string().one_of(PROJECT_STAGES))
});

impl Dto for UpdateStageDto {
    fn schema() -> &'static Schema {
        &UPDATE_STAGE_SCHEMA
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use bcpms_core::validation::{validate_payload, UnknownFieldPolicy};
    use serde_json::json;

    use super::*;

    #[test]
    fn create_project_sanitizes_name() {
        let dto: CreateProjectDto = validate_payload(
            json!({ "name": "<b>Atlas</b> rollout", "estimatedValue": 1200.5 }),
            UnknownFieldPolicy::Strip,
        )
        .unwrap();
        assert_eq!(dto.name, "Atlas rollout");
        assert_eq!(dto.stage, None);
    }

    #[test]
    fn create_project_rejects_pipeline_stage() {
        let err = validate_payload::<CreateProjectDto>(
            json!({ "name": "Atlas", "stage": "lead" }),
            UnknownFieldPolicy::Strip,
        )
        .unwrap_err();
        assert_matches!(err, CoreError::InvalidFields(ref e) if e.fields() == vec!["stage"]);
    }

    #[test]
    fn name_that_sanitizes_to_nothing_is_rejected() {
        let err = validate_payload::<CreatePipelineEntryDto>(
            json!({ "name": "<script>x</script>" }),
            UnknownFieldPolicy::Strip,
        )
        .unwrap_err();
        assert_matches!(err, CoreError::InvalidFields(ref e) if e.fields() == vec!["name"]);
    }

    #[test]
    fn negative_estimated_value_is_rejected() {
        let err = validate_payload::<CreatePipelineEntryDto>(
            json!({ "name": "Lead", "estimatedValue": -1 }),
            UnknownFieldPolicy::Strip,
        )
        .unwrap_err();
        assert_matches!(err, CoreError::InvalidFields(ref e) if e.fields() == vec!["estimatedValue"]);
    }

    #[test]
    fn update_stage_requires_known_stage() {
        let ok: UpdateStageDto =
            validate_payload(json!({ "stage": "won" }), UnknownFieldPolicy::Strip).unwrap();
        assert_eq!(ok.stage, ProjectStage::Won);
        assert_matches!(
            validate_payload::<UpdateStageDto>(json!({ "stage": "closed" }), UnknownFieldPolicy::Strip),
            Err(CoreError::InvalidFields(_))
        );
        assert_matches!(
            validate_payload::<UpdateStageDto>(json!({}), UnknownFieldPolicy::Strip),
            Err(CoreError::InvalidFields(_))
        );
    }
}
