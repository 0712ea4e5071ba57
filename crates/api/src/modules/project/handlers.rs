//! Handlers for the `/projects` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bcpms_core::stages::ProjectStage;
use bcpms_core::types::DbId;
use bcpms_db::models::project::{CreateProjectDto, Project, UpdateProjectDto};
use bcpms_db::models::task::{LinkTaskDto, Task};
use bcpms_db::models::weekly_note::{AddWeeklyNoteDto, WeeklyNote};

use super::ProjectService;
use crate::error::AppResult;
use crate::extract::ValidatedJson;
use crate::query::StageFilterParams;
use crate::response::DataResponse;

/// GET /api/v1/projects
pub async fn list(
    State(service): State<ProjectService>,
    Query(params): Query<StageFilterParams>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let stage = params.stage.as_deref().map(ProjectStage::parse).transpose()?;
    Ok(Json(DataResponse {
        data: service.list(stage).await?,
    }))
}

/// POST /api/v1/projects
pub async fn create(
    State(service): State<ProjectService>,
    ValidatedJson(input): ValidatedJson<CreateProjectDto>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    let project = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(service): State<ProjectService>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    Ok(Json(DataResponse {
        data: service.get(id).await?,
    }))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(service): State<ProjectService>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateProjectDto>,
) -> AppResult<Json<DataResponse<Project>>> {
    Ok(Json(DataResponse {
        data: service.update(id, input).await?,
    }))
}

/// DELETE /api/v1/projects/{id}
pub async fn delete(
    State(service): State<ProjectService>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/projects/{id}/tasks
pub async fn list_tasks(
    State(service): State<ProjectService>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Task>>>> {
    Ok(Json(DataResponse {
        data: service.tasks(id).await?,
    }))
}

/// POST /api/v1/projects/{id}/tasks/link
pub async fn link_task(
    State(service): State<ProjectService>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<LinkTaskDto>,
) -> AppResult<Json<DataResponse<Task>>> {
    Ok(Json(DataResponse {
        data: service.link_task(id, input).await?,
    }))
}

/// GET /api/v1/projects/{id}/weekly-notes
pub async fn list_weekly_notes(
    State(service): State<ProjectService>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<WeeklyNote>>>> {
    Ok(Json(DataResponse {
        data: service.weekly_notes(id).await?,
    }))
}

/// POST /api/v1/projects/{id}/weekly-notes
pub async fn add_weekly_note(
    State(service): State<ProjectService>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<AddWeeklyNoteDto>,
) -> AppResult<(StatusCode, Json<DataResponse<WeeklyNote>>)> {
    let note = service.add_weekly_note(id, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: note })))
}
