//! Dashboard module: one summary read combining reports and the upcoming
//! calendar.

mod handlers;
mod service;

use axum::routing::get;
use axum::Router;
use bcpms_db::Database;

pub use service::{DashboardService, DashboardSummary, UPCOMING_DAYS};

use super::calendar::RRuleService;
use super::report::ReportService;
use super::{Consumed, FeatureModule, ModuleDescriptor};

pub const DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "dashboard",
    imports: &["database", "report", "calendar"],
    controllers: &["/dashboard"],
    providers: &[],
    exports: &[],
    consumes: &[
        Consumed::new("database", "Database"),
        Consumed::new("report", "ReportService"),
        Consumed::new("calendar", "RRuleService"),
    ],
};

pub struct DashboardModule {
    service: DashboardService,
}

impl DashboardModule {
    pub fn new(db: Database, reports: ReportService, rrule: RRuleService) -> Self {
        Self {
            service: DashboardService::new(db, reports, rrule),
        }
    }
}

impl FeatureModule for DashboardModule {
    fn descriptor(&self) -> &'static ModuleDescriptor {
        &DESCRIPTOR
    }

    /// Routes mounted at `/dashboard`.
    ///
    /// ```text
    /// GET /summary    -> summary
    /// ```
    fn router(&self) -> Router {
        let routes = Router::new()
            .route("/summary", get(handlers::summary))
            .with_state(self.service.clone());
        Router::new().nest("/dashboard", routes)
    }
}
