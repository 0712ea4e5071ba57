use axum::extract::State;
use axum::Json;

use super::{DashboardService, DashboardSummary};
use crate::error::AppResult;
use crate::response::DataResponse;

/// GET /api/v1/dashboard/summary
pub async fn summary(
    State(service): State<DashboardService>,
) -> AppResult<Json<DataResponse<DashboardSummary>>> {
    Ok(Json(DataResponse {
        data: service.summary().await?,
    }))
}
