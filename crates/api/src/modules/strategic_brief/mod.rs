//! Strategic brief module: briefs attached to a pipeline entry or a
//! project, with a draft/submit/revise/approve workflow.

mod handlers;
mod service;

use axum::routing::{get, post};
use axum::Router;
use bcpms_db::Database;

pub use service::BriefService;

use super::{Consumed, FeatureModule, ModuleDescriptor};

pub const DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "strategic-brief",
    imports: &["database"],
    controllers: &["/briefs"],
    providers: &["BriefService"],
    exports: &[],
    consumes: &[Consumed::new("database", "Database")],
};

pub struct StrategicBriefModule {
    service: BriefService,
}

impl StrategicBriefModule {
    pub fn new(db: Database) -> Self {
        Self {
            service: BriefService::new(db),
        }
    }
}

impl FeatureModule for StrategicBriefModule {
    fn descriptor(&self) -> &'static ModuleDescriptor {
        &DESCRIPTOR
    }

    /// Routes mounted at `/briefs`.
    ///
    /// ```text
    /// GET    /                          -> list (?projectId=&pipelineId=)
    /// POST   /                          -> create
    /// GET    /{id}                      -> get_by_id (with revisions)
    /// PUT    /{id}                      -> update
    /// POST   /{id}/submit               -> submit
    /// POST   /{id}/request-revision     -> request_revision
    /// POST   /{id}/approve              -> approve
    /// ```
    fn router(&self) -> Router {
        let routes = Router::new()
            .route("/", get(handlers::list).post(handlers::create))
            .route("/{id}", get(handlers::get_by_id).put(handlers::update))
            .route("/{id}/submit", post(handlers::submit))
            .route("/{id}/request-revision", post(handlers::request_revision))
            .route("/{id}/approve", post(handlers::approve))
            .with_state(self.service.clone());
        Router::new().nest("/briefs", routes)
    }
}
