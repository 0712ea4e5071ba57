//! File module: uploads stored in object storage, metadata in `files`.

mod handlers;
mod service;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use bcpms_db::Database;
use bcpms_storage::ObjectStorage;

pub use service::{FileService, Upload};

use super::{Consumed, FeatureModule, ModuleDescriptor};

pub const DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "file",
    imports: &["database", "storage"],
    controllers: &["/files"],
    providers: &["FileService"],
    exports: &[],
    consumes: &[
        Consumed::new("database", "Database"),
        Consumed::new("storage", "ObjectStorage"),
    ],
};

pub struct FileModule {
    service: FileService,
}

impl FileModule {
    pub fn new(db: Database, storage: Arc<dyn ObjectStorage>) -> Self {
        Self {
            service: FileService::new(db, storage),
        }
    }
}

impl FeatureModule for FileModule {
    fn descriptor(&self) -> &'static ModuleDescriptor {
        &DESCRIPTOR
    }

    /// Routes mounted at `/files`.
    ///
    /// ```text
    /// GET    /                 -> list (?projectId=)
    /// POST   /                 -> upload (multipart: file, projectId?)
    /// GET    /{id}             -> get_by_id
    /// GET    /{id}/download    -> download
    /// DELETE /{id}             -> delete
    /// ```
    fn router(&self) -> Router {
        let routes = Router::new()
            .route("/", get(handlers::list).post(handlers::upload))
            .route("/{id}", get(handlers::get_by_id).delete(handlers::delete))
            .route("/{id}/download", get(handlers::download))
            .with_state(self.service.clone());
        Router::new().nest("/files", routes)
    }
}
