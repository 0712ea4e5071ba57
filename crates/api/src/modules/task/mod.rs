//! Task module: `/tasks`, plus the link logic the project controller uses.

mod handlers;
mod service;

use axum::routing::get;
use axum::Router;
use bcpms_db::Database;

pub use service::TaskService;

use super::{Consumed, FeatureModule, ModuleDescriptor};

pub const DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "task",
    imports: &["database"],
    controllers: &["/tasks"],
    providers: &["TaskService"],
    exports: &["TaskService"],
    consumes: &[Consumed::new("database", "Database")],
};

pub struct TaskModule {
    service: TaskService,
}

impl TaskModule {
    pub fn new(db: Database) -> Self {
        Self {
            service: TaskService::new(db),
        }
    }

    pub fn service(&self) -> &TaskService {
        &self.service
    }
}

impl FeatureModule for TaskModule {
    fn descriptor(&self) -> &'static ModuleDescriptor {
        &DESCRIPTOR
    }

    /// Routes mounted at `/tasks`.
    ///
    /// ```text
    /// GET    /        -> list (?projectId=&status=)
    /// POST   /        -> create
    /// GET    /{id}    -> get_by_id
    /// PUT    /{id}    -> update
    /// DELETE /{id}    -> delete
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
            .with_state(self.service.clone());
        Router::new().nest("/tasks", routes)
    }
}
