//! Handlers for the `/sales-pipeline` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bcpms_core::stages::ProjectStage;
use bcpms_core::types::DbId;
use bcpms_db::models::project::{CreatePipelineEntryDto, Project, UpdateStageDto};
use bcpms_db::models::weekly_note::{AddWeeklyNoteDto, WeeklyNote};

use super::PipelineService;
use crate::error::AppResult;
use crate::extract::ValidatedJson;
use crate::query::StageFilterParams;
use crate::response::DataResponse;

/// GET /api/v1/sales-pipeline
pub async fn list(
    State(service): State<PipelineService>,
    Query(params): Query<StageFilterParams>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let stage = params.stage.as_deref().map(ProjectStage::parse).transpose()?;
    Ok(Json(DataResponse {
        data: service.list(stage).await?,
    }))
}

/// POST /api/v1/sales-pipeline
pub async fn create(
    State(service): State<PipelineService>,
    ValidatedJson(input): ValidatedJson<CreatePipelineEntryDto>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    let entry = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// GET /api/v1/sales-pipeline/{id}
pub async fn get_by_id(
    State(service): State<PipelineService>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    Ok(Json(DataResponse {
        data: service.get(id).await?,
    }))
}

/// PUT /api/v1/sales-pipeline/{id}/stage
pub async fn move_stage(
    State(service): State<PipelineService>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateStageDto>,
) -> AppResult<Json<DataResponse<Project>>> {
    Ok(Json(DataResponse {
        data: service.move_stage(id, input.stage).await?,
    }))
}

/// POST /api/v1/sales-pipeline/{id}/convert
pub async fn convert(
    State(service): State<PipelineService>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    Ok(Json(DataResponse {
        data: service.convert(id).await?,
    }))
}

/// GET /api/v1/sales-pipeline/{id}/weekly-notes
pub async fn list_weekly_notes(
    State(service): State<PipelineService>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<WeeklyNote>>>> {
    Ok(Json(DataResponse {
        data: service.weekly_notes(id).await?,
    }))
}

/// POST /api/v1/sales-pipeline/{id}/weekly-notes
pub async fn add_weekly_note(
    State(service): State<PipelineService>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<AddWeeklyNoteDto>,
) -> AppResult<(StatusCode, Json<DataResponse<WeeklyNote>>)> {
    let note = service.add_weekly_note(id, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: note })))
}
