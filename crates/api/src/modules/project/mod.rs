//! Project module: `/projects`, its task links and weekly timeline.

mod handlers;
mod service;

use axum::routing::{get, post};
use axum::Router;
use bcpms_db::Database;

pub use service::ProjectService;

use super::task::TaskService;
use super::{Consumed, FeatureModule, ModuleDescriptor};

pub const DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "project",
    imports: &["database", "task"],
    controllers: &["/projects"],
    providers: &["ProjectService"],
    exports: &["ProjectService"],
    consumes: &[
        Consumed::new("database", "Database"),
        Consumed::new("task", "TaskService"),
    ],
};

pub struct ProjectModule {
    service: ProjectService,
}

impl ProjectModule {
    pub fn new(db: Database, tasks: TaskService) -> Self {
        Self {
            service: ProjectService::new(db, tasks),
        }
    }

    pub fn service(&self) -> &ProjectService {
        &self.service
    }
}

impl FeatureModule for ProjectModule {
    fn descriptor(&self) -> &'static ModuleDescriptor {
        &DESCRIPTOR
    }

    /// Routes mounted at `/projects`.
    ///
    /// ```text
    /// GET    /                     -> list (?stage=)
    /// POST   /                     -> create
    /// GET    /{id}                 -> get_by_id
    /// PUT    /{id}                 -> update
    /// DELETE /{id}                 -> delete (soft)
    ///
    /// GET    /{id}/tasks           -> list_tasks
    /// POST   /{id}/tasks/link      -> link_task
    ///
    /// GET    /{id}/weekly-notes    -> list_weekly_notes
    /// POST   /{id}/weekly-notes    -> add_weekly_note
    /// ```
    fn router(&self) -> Router {
        let routes = Router::new()
            .route("/", get(handlers::list).post(handlers::create))
            .route(
                "/{id}",
                get(handlers::get_by_id)
                    .put(handlers::update)
                    .delete(handlers::delete),
            )
            .route("/{id}/tasks", get(handlers::list_tasks))
            .route("/{id}/tasks/link", post(handlers::link_task))
            .route(
                "/{id}/weekly-notes",
                get(handlers::list_weekly_notes).post(handlers::add_weekly_note),
            )
            .with_state(self.service.clone());
        Router::new().nest("/projects", routes)
    }
}
