//! Shared query parameter types for API handlers.

use bcpms_core::error::CoreError;
use bcpms_core::types::{parse_optional_id, DbId};
use serde::Deserialize;

/// `?projectId=` filter used by several list endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFilterParams {
    pub project_id: Option<String>,
}

impl ProjectFilterParams {
    pub fn project_id(&self) -> Result<Option<DbId>, CoreError> {
        parse_optional_id("projectId", self.project_id.as_deref())
    }
}

/// `?stage=` filter for project and pipeline listings.
#[derive(Debug, Default, Deserialize)]
pub struct StageFilterParams {
    pub stage: Option<String>,
}
