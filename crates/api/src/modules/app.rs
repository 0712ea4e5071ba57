//! Composition root.

use std::sync::Arc;

use axum::Router;
use bcpms_db::Database;
use bcpms_storage::ObjectStorage;

use super::calendar::CalendarModule;
use super::dashboard::DashboardModule;
use super::file::FileModule;
use super::project::ProjectModule;
use super::report::ReportModule;
use super::sales_pipeline::SalesPipelineModule;
use super::shared::{DATABASE_MODULE, STORAGE_MODULE};
use super::strategic_brief::StrategicBriefModule;
use super::task::TaskModule;
use super::{verify_graph, CompositionError, FeatureModule, ModuleDescriptor};

/// Shared singletons handed to every module that imports them.
#[derive(Clone)]
pub struct ComposeDeps {
    pub database: Database,
    pub storage: Arc<dyn ObjectStorage>,
}

/// Every feature module, built once.
pub struct AppModule {
    database: Database,
    modules: Vec<Box<dyn FeatureModule>>,
}

impl std::fmt::Debug for AppModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppModule")
            .field("database", &self.database)
            .field(
                "modules",
                &self.modules.iter().map(|m| m.descriptor().name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl AppModule {
    /// Build all feature modules leaf-first and verify the module graph.
    pub fn compose(deps: ComposeDeps) -> Result<Self, CompositionError> {
        let ComposeDeps { database, storage } = deps;

        let task = TaskModule::new(database.clone());
        let project = ProjectModule::new(database.clone(), task.service().clone());
        let pipeline = SalesPipelineModule::new(database.clone(), project.service().clone());
        let brief = StrategicBriefModule::new(database.clone());
        let calendar = CalendarModule::new(database.clone());
        let file = FileModule::new(database.clone(), storage);
        let report = ReportModule::new(database.clone());
        let dashboard = DashboardModule::new(
            database.clone(),
            report.service().clone(),
            calendar.rrule().clone(),
        );

        Self::from_modules(
            database,
            vec![
                Box::new(task),
                Box::new(project),
                Box::new(pipeline),
                Box::new(brief),
                Box::new(calendar),
                Box::new(file),
                Box::new(report),
                Box::new(dashboard),
            ],
        )
    }

    /// Wrap already-built modules, rejecting an inconsistent graph.
    pub fn from_modules(
        database: Database,
        modules: Vec<Box<dyn FeatureModule>>,
    ) -> Result<Self, CompositionError> {
        let app = Self { database, modules };
        verify_graph(&app.descriptors())?;
        tracing::info!(
            modules = app.modules.len(),
            controllers = app.controllers().len(),
            "Feature modules composed",
        );
        Ok(app)
    }

    /// Shared modules first, then feature modules in build order.
    pub fn descriptors(&self) -> Vec<&'static ModuleDescriptor> {
        let mut out: Vec<&'static ModuleDescriptor> = vec![&DATABASE_MODULE, &STORAGE_MODULE];
        out.extend(self.modules.iter().map(|m| m.descriptor()));
        out
    }

    /// Every controller prefix, in registration order.
    pub fn controllers(&self) -> Vec<&'static str> {
        self.modules
            .iter()
            .flat_map(|m| m.descriptor().controllers.iter().copied())
            .collect()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// All controllers, nested under `/api/v1`.
    pub fn router(&self) -> Router {
        let api = self
            .modules
            .iter()
            .fold(Router::new(), |router, module| router.merge(module.router()));
        Router::new().nest("/api/v1", api)
    }
}
