//! Calendar module: events with optional recurrence, and the occurrence
//! expansion the dashboard reuses through [`RRuleService`].

mod handlers;
mod rrule;
mod service;

use axum::routing::get;
use axum::Router;
use bcpms_db::Database;

pub use rrule::{Occurrence, RRuleService};
pub use service::CalendarService;

use super::{Consumed, FeatureModule, ModuleDescriptor};

pub const DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "calendar",
    imports: &["database"],
    controllers: &["/calendar"],
    providers: &["CalendarService", "RRuleService"],
    exports: &["RRuleService"],
    consumes: &[Consumed::new("database", "Database")],
};

pub struct CalendarModule {
    service: CalendarService,
    rrule: RRuleService,
}

impl CalendarModule {
    pub fn new(db: Database) -> Self {
        let rrule = RRuleService::new();
        Self {
            service: CalendarService::new(db, rrule.clone()),
            rrule,
        }
    }

    pub fn rrule(&self) -> &RRuleService {
        &self.rrule
    }
}

impl FeatureModule for CalendarModule {
    fn descriptor(&self) -> &'static ModuleDescriptor {
        &DESCRIPTOR
    }

    /// Routes mounted at `/calendar`.
    ///
    /// ```text
    /// GET    /events          -> list (?projectId=)
    /// POST   /events          -> create
    /// GET    /events/{id}     -> get_by_id
    /// PUT    /events/{id}     -> update
    /// DELETE /events/{id}     -> delete
    /// GET    /occurrences     -> occurrences (?from=&to=&projectId=)
    /// ```
    fn router(&self) -> Router {
        let routes = Router::new()
            .route("/events", get(handlers::list).post(handlers::create))
            .route(
                "/events/{id}",
                get(handlers::get_by_id)
                    .put(handlers::update)
                    .delete(handlers::delete),
            )
            .route("/occurrences", get(handlers::occurrences))
            .with_state(self.service.clone());
        Router::new().nest("/calendar", routes)
    }
}
