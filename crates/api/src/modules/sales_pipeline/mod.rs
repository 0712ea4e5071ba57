//! Sales pipeline module: leads and opportunities before they become
//! projects.
//!
//! Pipeline entries are `projects` rows without a conversion timestamp.
//! Stage moves and the weekly timeline go through [`ProjectService`], so the
//! transition rules live in one place.

mod handlers;
mod service;

use axum::routing::{get, post, put};
use axum::Router;
use bcpms_db::Database;

pub use service::PipelineService;

use super::project::ProjectService;
use super::{Consumed, FeatureModule, ModuleDescriptor};

pub const DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "sales-pipeline",
    imports: &["database", "project"],
    controllers: &["/sales-pipeline"],
    providers: &["PipelineService"],
    exports: &[],
    consumes: &[
        Consumed::new("database", "Database"),
        Consumed::new("project", "ProjectService"),
    ],
};

pub struct SalesPipelineModule {
    service: PipelineService,
}

impl SalesPipelineModule {
    pub fn new(db: Database, projects: ProjectService) -> Self {
        Self {
            service: PipelineService::new(db, projects),
        }
    }
}

impl FeatureModule for SalesPipelineModule {
    fn descriptor(&self) -> &'static ModuleDescriptor {
        &DESCRIPTOR
    }

    /// Routes mounted at `/sales-pipeline`.
    ///
    /// ```text
    /// GET    /                     -> list (?stage=)
    /// POST   /                     -> create
    /// GET    /{id}                 -> get_by_id
    /// PUT    /{id}/stage           -> move_stage
    /// POST   /{id}/convert         -> convert
    /// GET    /{id}/weekly-notes    -> list_weekly_notes
    /// POST   /{id}/weekly-notes    -> add_weekly_note
    /// ```
    fn router(&self) -> Router {
        let routes = Router::new()
            .route("/", get(handlers::list).post(handlers::create))
            .route("/{id}", get(handlers::get_by_id))
            .route("/{id}/stage", put(handlers::move_stage))
            .route("/{id}/convert", post(handlers::convert))
            .route(
                "/{id}/weekly-notes",
                get(handlers::list_weekly_notes).post(handlers::add_weekly_note),
            )
            .with_state(self.service.clone());
        Router::new().nest("/sales-pipeline", routes)
    }
}
