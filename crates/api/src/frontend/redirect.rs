//! Legacy frontend routes.
//!
//! Sales pipeline detail pages moved under projects; old links keep working
//! through a plain redirect.

use axum::extract::Path;
use axum::response::Redirect;
use axum::routing::get;
use axum::Router;

/// Target path for a legacy pipeline detail page.
///
/// `id` is percent-encoded so it stays a single path segment; dot segments
/// are encoded too so clients cannot collapse them.
pub fn project_detail_path(id: &str) -> String {
    let segment = match id {
        "." => "%2E".to_string(),
        ".." => "%2E%2E".to_string(),
        other => urlencoding::encode(other).into_owned(),
    };
    format!("/dashboard/projects/{segment}")
}

/// GET /dashboard/sales-pipeline/{id}
///
/// 307 to `/dashboard/projects/{id}` with an empty body.
async fn legacy_pipeline_detail(Path(id): Path<String>) -> Redirect {
    Redirect::temporary(&project_detail_path(&id))
}

pub fn router() -> Router {
    Router::new().route(
        "/dashboard/sales-pipeline/{id}",
        get(legacy_pipeline_detail),
    )
}
