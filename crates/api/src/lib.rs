pub mod config;
pub mod error;
pub mod extract;
pub mod frontend;
pub mod modules;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
