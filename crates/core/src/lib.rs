//! Domain building blocks shared by every BC PMS crate.
//!
//! Pure logic only: nothing in here touches the database, object storage,
//! or HTTP. The persistence and API crates build on these types.

pub mod error;
pub mod rrule;
pub mod sanitize;
pub mod stages;
pub mod types;
pub mod validation;
