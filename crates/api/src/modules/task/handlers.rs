//! Handlers for the `/tasks` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bcpms_core::stages::TaskStatus;
use bcpms_core::types::{parse_optional_id, DbId};
use bcpms_db::models::task::{CreateTaskDto, Task, UpdateTaskDto};
use serde::Deserialize;

use super::TaskService;
use crate::error::AppResult;
use crate::extract::ValidatedJson;
use crate::response::DataResponse;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListParams {
    pub project_id: Option<String>,
    pub status: Option<String>,
}

/// GET /api/v1/tasks
pub async fn list(
    State(service): State<TaskService>,
    Query(params): Query<TaskListParams>,
) -> AppResult<Json<DataResponse<Vec<Task>>>> {
    let project_id = parse_optional_id("projectId", params.project_id.as_deref())?;
    let status = params.status.as_deref().map(TaskStatus::parse).transpose()?;
    let tasks = service.list(project_id, status).await?;
    Ok(Json(DataResponse { data: tasks }))
}

/// POST /api/v1/tasks
pub async fn create(
    State(service): State<TaskService>,
    ValidatedJson(input): ValidatedJson<CreateTaskDto>,
) -> AppResult<(StatusCode, Json<DataResponse<Task>>)> {
    let task = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// GET /api/v1/tasks/{id}
pub async fn get_by_id(
    State(service): State<TaskService>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Task>>> {
    Ok(Json(DataResponse {
        data: service.get(id).await?,
    }))
}

/// PUT /api/v1/tasks/{id}
pub async fn update(
    State(service): State<TaskService>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateTaskDto>,
) -> AppResult<Json<DataResponse<Task>>> {
    Ok(Json(DataResponse {
        data: service.update(id, input).await?,
    }))
}

/// DELETE /api/v1/tasks/{id}
pub async fn delete(State(service): State<TaskService>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
