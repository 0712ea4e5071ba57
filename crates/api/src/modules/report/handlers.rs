//! Handlers for the `/reports` resource.

use axum::extract::{Path, State};
use axum::Json;
use bcpms_core::types::DbId;
use bcpms_db::models::report::{OverviewReport, PipelineReport, ProjectReport};

use super::ReportService;
use crate::error::AppResult;
use crate::response::DataResponse;

/// GET /api/v1/reports/overview
pub async fn overview(
    State(service): State<ReportService>,
) -> AppResult<Json<DataResponse<OverviewReport>>> {
    Ok(Json(DataResponse {
        data: service.overview().await?,
    }))
}

/// GET /api/v1/reports/pipeline
pub async fn pipeline(
    State(service): State<ReportService>,
) -> AppResult<Json<DataResponse<PipelineReport>>> {
    Ok(Json(DataResponse {
        data: service.pipeline().await?,
    }))
}

/// GET /api/v1/reports/projects/{id}
pub async fn project(
    State(service): State<ReportService>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectReport>>> {
    Ok(Json(DataResponse {
        data: service.project(id).await?,
    }))
}
