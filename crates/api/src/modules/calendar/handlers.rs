//! Handlers for the `/calendar` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bcpms_core::types::{parse_optional_id, DbId, Timestamp};
use bcpms_db::models::calendar_event::{CalendarEvent, CreateEventDto, UpdateEventDto};
use serde::Deserialize;

use super::{CalendarService, Occurrence};
use crate::error::AppResult;
use crate::extract::ValidatedJson;
use crate::query::ProjectFilterParams;
use crate::response::DataResponse;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrenceParams {
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub project_id: Option<String>,
}

/// GET /api/v1/calendar/events
pub async fn list(
    State(service): State<CalendarService>,
    Query(params): Query<ProjectFilterParams>,
) -> AppResult<Json<DataResponse<Vec<CalendarEvent>>>> {
    Ok(Json(DataResponse {
        data: service.list(params.project_id()?).await?,
    }))
}

/// POST /api/v1/calendar/events
pub async fn create(
    State(service): State<CalendarService>,
    ValidatedJson(input): ValidatedJson<CreateEventDto>,
) -> AppResult<(StatusCode, Json<DataResponse<CalendarEvent>>)> {
    let event = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: event })))
}

/// GET /api/v1/calendar/events/{id}
pub async fn get_by_id(
    State(service): State<CalendarService>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CalendarEvent>>> {
    Ok(Json(DataResponse {
        data: service.get(id).await?,
    }))
}

/// PUT /api/v1/calendar/events/{id}
pub async fn update(
    State(service): State<CalendarService>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateEventDto>,
) -> AppResult<Json<DataResponse<CalendarEvent>>> {
    Ok(Json(DataResponse {
        data: service.update(id, input).await?,
    }))
}

/// DELETE /api/v1/calendar/events/{id}
pub async fn delete(
    State(service): State<CalendarService>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/calendar/occurrences
pub async fn occurrences(
    State(service): State<CalendarService>,
    Query(params): Query<OccurrenceParams>,
) -> AppResult<Json<DataResponse<Vec<Occurrence>>>> {
    let project_id = parse_optional_id("projectId", params.project_id.as_deref())?;
    Ok(Json(DataResponse {
        data: service.occurrences(params.from, params.to, project_id).await?,
    }))
}
