//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - Inbound DTOs implementing [`bcpms_core::validation::Dto`], each with a
//!   static schema declaring presence, sanitize steps and constraints
//!
//! Rows and DTOs use camelCase on the wire.

pub mod brief;
pub mod calendar_event;
pub mod file;
pub mod project;
pub mod report;
pub mod task;
pub mod weekly_note;
