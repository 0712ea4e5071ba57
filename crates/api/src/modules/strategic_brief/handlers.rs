//! Handlers for the `/briefs` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bcpms_core::types::{parse_optional_id, DbId};
use bcpms_db::models::brief::{
    BriefWithRevisions, CreateBriefDto, RequestRevisionDto, StrategicBrief, UpdateBriefDto,
};
use serde::Deserialize;

use super::BriefService;
use crate::error::AppResult;
use crate::extract::ValidatedJson;
use crate::response::DataResponse;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BriefListParams {
    pub project_id: Option<String>,
    pub pipeline_id: Option<String>,
}

/// GET /api/v1/briefs
pub async fn list(
    State(service): State<BriefService>,
    Query(params): Query<BriefListParams>,
) -> AppResult<Json<DataResponse<Vec<StrategicBrief>>>> {
    let project_id = parse_optional_id("projectId", params.project_id.as_deref())?;
    let pipeline_id = parse_optional_id("pipelineId", params.pipeline_id.as_deref())?;
    Ok(Json(DataResponse {
        data: service.list(project_id, pipeline_id).await?,
    }))
}

/// POST /api/v1/briefs
pub async fn create(
    State(service): State<BriefService>,
    ValidatedJson(input): ValidatedJson<CreateBriefDto>,
) -> AppResult<(StatusCode, Json<DataResponse<StrategicBrief>>)> {
    let brief = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: brief })))
}

/// GET /api/v1/briefs/{id}
pub async fn get_by_id(
    State(service): State<BriefService>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<BriefWithRevisions>>> {
    Ok(Json(DataResponse {
        data: service.get_with_revisions(id).await?,
    }))
}

/// PUT /api/v1/briefs/{id}
pub async fn update(
    State(service): State<BriefService>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateBriefDto>,
) -> AppResult<Json<DataResponse<StrategicBrief>>> {
    Ok(Json(DataResponse {
        data: service.update(id, input).await?,
    }))
}

/// POST /api/v1/briefs/{id}/submit
pub async fn submit(
    State(service): State<BriefService>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<StrategicBrief>>> {
    Ok(Json(DataResponse {
        data: service.submit(id).await?,
    }))
}

/// POST /api/v1/briefs/{id}/request-revision
pub async fn request_revision(
    State(service): State<BriefService>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<RequestRevisionDto>,
) -> AppResult<Json<DataResponse<StrategicBrief>>> {
    Ok(Json(DataResponse {
        data: service.request_revision(id, input).await?,
    }))
}

/// POST /api/v1/briefs/{id}/approve
pub async fn approve(
    State(service): State<BriefService>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<StrategicBrief>>> {
    Ok(Json(DataResponse {
        data: service.approve(id).await?,
    }))
}
