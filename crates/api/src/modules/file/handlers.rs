//! Handlers for the `/files` resource.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use bcpms_core::types::{parse_optional_id, DbId};
use bcpms_db::models::file::FileRecord;

use super::service::content_disposition;
use super::{FileService, Upload};
use crate::error::{AppError, AppResult};
use crate::query::ProjectFilterParams;
use crate::response::DataResponse;

/// GET /api/v1/files
pub async fn list(
    State(service): State<FileService>,
    Query(params): Query<ProjectFilterParams>,
) -> AppResult<Json<DataResponse<Vec<FileRecord>>>> {
    Ok(Json(DataResponse {
        data: service.list(params.project_id()?).await?,
    }))
}

/// POST /api/v1/files
///
/// Multipart form with a required `file` part and an optional `projectId`
/// text part. Other parts are ignored.
pub async fn upload(
    State(service): State<FileService>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<FileRecord>>)> {
    let mut file: Option<(String, Option<String>, Vec<u8>)> = None;
    let mut project_id: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                file = Some((filename, content_type, data.to_vec()));
            }
            "projectId" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                project_id = Some(text);
            }
            _ => {}
        }
    }

    let (original_name, content_type, bytes) =
        file.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    let project_id = parse_optional_id("projectId", project_id.as_deref().filter(|s| !s.is_empty()))?;

    let record = service
        .upload(Upload {
            original_name,
            content_type,
            bytes,
            project_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// GET /api/v1/files/{id}
pub async fn get_by_id(
    State(service): State<FileService>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<FileRecord>>> {
    Ok(Json(DataResponse {
        data: service.get(id).await?,
    }))
}

/// GET /api/v1/files/{id}/download
pub async fn download(
    State(service): State<FileService>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let (record, bytes) = service.download(id).await?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, record.content_type.clone()),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(&record.original_name),
            ),
        ],
        bytes,
    ))
}

/// DELETE /api/v1/files/{id}
pub async fn delete(
    State(service): State<FileService>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
