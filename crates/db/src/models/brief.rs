//! Strategic brief model, revision history, and DTOs.

use std::sync::LazyLock;

use bcpms_core::error::CoreError;
use bcpms_core::stages::BriefStatus;
use bcpms_core::types::{DbId, Timestamp};
use bcpms_core::validation::{Dto, FieldRule, Schema};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `strategic_briefs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategicBrief {
    pub id: DbId,
    pub pipeline_id: Option<DbId>,
    pub project_id: Option<DbId>,
    pub title: Option<String>,
    pub objectives: Option<String>,
    pub target_audience: Option<String>,
    pub key_messages: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl StrategicBrief {
    pub fn status(&self) -> Result<BriefStatus, CoreError> {
        BriefStatus::parse(&self.status)
    }
}

/// A row from the `brief_revisions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BriefRevision {
    pub id: DbId,
    pub brief_id: DbId,
    pub comment: String,
    pub created_at: Timestamp,
}

/// A brief with its revision requests, oldest first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BriefWithRevisions {
    #[serde(flatten)]
    pub brief: StrategicBrief,
    pub revisions: Vec<BriefRevision>,
}

/// What a new brief is attached to, once the wire ids are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BriefParent {
    Pipeline(DbId),
    Project(DbId),
    Unattached,
}

/// DTO for creating a brief.
///
/// Accepts neither, either, or both parent ids; the brief service rejects
/// the both-supplied case before any write.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBriefDto {
    pub pipeline_id: Option<String>,
    pub project_id: Option<String>,
    pub title: Option<String>,
    pub objectives: Option<String>,
    pub target_audience: Option<String>,
    pub key_messages: Option<String>,
}

static CREATE_BRIEF_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .field(FieldRule::optional("pipelineId").string())
        .field(FieldRule::optional("projectId").string())
        .field(FieldRule::optional("title").sanitized().string().max_length(300))
        .field(FieldRule::optional("objectives").sanitized().string().max_length(10_000))
        .field(FieldRule::optional("targetAudience").sanitized().string().max_length(10_000))
        .field(FieldRule::optional("keyMessages").sanitized().string().max_length(10_000))
});

impl Dto for CreateBriefDto {
    fn schema() -> &'static Schema {
        &CREATE_BRIEF_SCHEMA
    }
}

/// DTO for editing a brief's content. Parent and status are not editable.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBriefDto {
    pub title: Option<String>,
    pub objectives: Option<String>,
    pub target_audience: Option<String>,
    pub key_messages: Option<String>,
}

static UPDATE_BRIEF_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .field(FieldRule::optional("title").sanitized().string().max_length(300))
        .field(FieldRule::optional("objectives").sanitized().string().max_length(10_000))
        .field(FieldRule::optional("targetAudience").sanitized().string().max_length(10_000))
        .field(FieldRule::optional("keyMessages").sanitized().string().max_length(10_000))
});

impl Dto for UpdateBriefDto {
    fn schema() -> &'static Schema {
        &UPDATE_BRIEF_SCHEMA
    }
}

/// DTO for sending a submitted brief back for revision.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RequestRevisionDto {
    pub comment: String,
}

static REQUEST_REVISION_SCHEMA: LazyLock<Schema> =
    LazyLock::new(|| Schema::new().field(FieldRule::required("comment").sanitized().string()));

impl Dto for RequestRevisionDto {
    fn schema() -> &'static Schema {
        &REQUEST_REVISION_SCHEMA
    }
}
