//! Report module: read-only aggregates over projects and tasks.

mod handlers;
mod service;

use axum::routing::get;
use axum::Router;
use bcpms_db::Database;

pub use service::ReportService;

use super::{Consumed, FeatureModule, ModuleDescriptor};

pub const DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "report",
    imports: &["database"],
    controllers: &["/reports"],
    providers: &["ReportService"],
    exports: &["ReportService"],
    consumes: &[Consumed::new("database", "Database")],
};

pub struct ReportModule {
    service: ReportService,
}

impl ReportModule {
    pub fn new(db: Database) -> Self {
        Self {
            service: ReportService::new(db),
        }
    }

    pub fn service(&self) -> &ReportService {
        &self.service
    }
}

impl FeatureModule for ReportModule {
    fn descriptor(&self) -> &'static ModuleDescriptor {
        &DESCRIPTOR
    }

    /// Routes mounted at `/reports`.
    ///
    /// ```text
    /// GET /overview         -> overview
    /// GET /pipeline         -> pipeline
    /// GET /projects/{id}    -> project
    /// ```
    fn router(&self) -> Router {
        let routes = Router::new()
            .route("/overview", get(handlers::overview))
            .route("/pipeline", get(handlers::pipeline))
            .route("/projects/{id}", get(handlers::project))
            .with_state(self.service.clone());
        Router::new().nest("/reports", routes)
    }
}
