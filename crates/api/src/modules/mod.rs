//! Feature modules and the composition root.
//!
//! Every feature area is a [`FeatureModule`]: a static [`ModuleDescriptor`]
//! manifest plus the axum router for its controllers. Modules receive their
//! collaborators through constructor arguments; [`AppModule::compose`] builds
//! them once, leaf-first, and refuses to start if the declared graph is
//! inconsistent.

pub mod app;
pub mod calendar;
pub mod dashboard;
pub mod file;
pub mod project;
pub mod report;
pub mod sales_pipeline;
pub mod shared;
pub mod strategic_brief;
pub mod task;

use std::collections::{HashMap, HashSet};

use axum::Router;

pub use app::{AppModule, ComposeDeps};

/// A provider one module takes from another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Consumed {
    pub module: &'static str,
    pub provider: &'static str,
}

impl Consumed {
    pub const fn new(module: &'static str, provider: &'static str) -> Self {
        Self { module, provider }
    }
}

/// Static manifest of a module.
#[derive(Debug, Clone, Copy)]
pub struct ModuleDescriptor {
    pub name: &'static str,
    /// Modules whose exports this module may consume.
    pub imports: &'static [&'static str],
    /// Route prefixes this module mounts under `/api/v1`.
    pub controllers: &'static [&'static str],
    pub providers: &'static [&'static str],
    /// Subset of `providers` other modules may consume.
    pub exports: &'static [&'static str],
    pub consumes: &'static [Consumed],
}

/// A composed feature area.
pub trait FeatureModule: Send + Sync {
    fn descriptor(&self) -> &'static ModuleDescriptor;

    /// Routes for every controller, at their full prefixes.
    fn router(&self) -> Router;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompositionError {
    #[error("module '{0}' is registered more than once")]
    DuplicateModule(&'static str),

    #[error("controller '{path}' is registered by both '{first}' and '{second}'")]
    DuplicateController {
        path: &'static str,
        first: &'static str,
        second: &'static str,
    },

    #[error("module '{module}' imports unknown module '{import}'")]
    UnknownImport {
        module: &'static str,
        import: &'static str,
    },

    #[error("module '{module}' consumes '{provider}' from '{from}' without importing it")]
    NotImported {
        module: &'static str,
        from: &'static str,
        provider: &'static str,
    },

    #[error("module '{module}' consumes '{provider}' which '{from}' does not export")]
    NotExported {
        module: &'static str,
        from: &'static str,
        provider: &'static str,
    },

    #[error("module '{module}' exports '{provider}' without providing it")]
    ExportWithoutProvider {
        module: &'static str,
        provider: &'static str,
    },
}

/// Check a module graph for consistency.
///
/// Module names and controller prefixes must be unique, every import must
/// name a module in the graph, every export must be a provider, and every
/// consumed provider must come from an imported module that exports it.
pub fn verify_graph(modules: &[&ModuleDescriptor]) -> Result<(), CompositionError> {
    let mut by_name: HashMap<&'static str, &ModuleDescriptor> = HashMap::new();
    for &module in modules {
        if by_name.insert(module.name, module).is_some() {
            return Err(CompositionError::DuplicateModule(module.name));
        }
    }

    let mut controllers: HashMap<&'static str, &'static str> = HashMap::new();
    for &module in modules {
        for &path in module.controllers {
            if let Some(first) = controllers.insert(path, module.name) {
                return Err(CompositionError::DuplicateController {
                    path,
                    first,
                    second: module.name,
                });
            }
        }

        for &provider in module.exports {
            if !module.providers.contains(&provider) {
                return Err(CompositionError::ExportWithoutProvider {
                    module: module.name,
                    provider,
                });
            }
        }

        let imports: HashSet<&'static str> = module.imports.iter().copied().collect();
        for &import in module.imports {
            if !by_name.contains_key(import) {
                return Err(CompositionError::UnknownImport {
                    module: module.name,
                    import,
                });
            }
        }

        for consumed in module.consumes {
            if !imports.contains(consumed.module) {
                return Err(CompositionError::NotImported {
                    module: module.name,
                    from: consumed.module,
                    provider: consumed.provider,
                });
            }
            let exported = by_name
                .get(consumed.module)
                .is_some_and(|m| m.exports.contains(&consumed.provider));
            if !exported {
                return Err(CompositionError::NotExported {
                    module: module.name,
                    from: consumed.module,
                    provider: consumed.provider,
                });
            }
        }
    }

    Ok(())
}
