//! Shared singleton modules. They own no controllers; the composition root
//! builds one instance of each and hands clones to consumers.

use super::ModuleDescriptor;

pub const DATABASE_MODULE: ModuleDescriptor = ModuleDescriptor {
    name: "database",
    imports: &[],
    controllers: &[],
    providers: &["Database"],
    exports: &["Database"],
    consumes: &[],
};

pub const STORAGE_MODULE: ModuleDescriptor = ModuleDescriptor {
    name: "storage",
    imports: &[],
    controllers: &[],
    providers: &["ObjectStorage"],
    exports: &["ObjectStorage"],
    consumes: &[],
};
