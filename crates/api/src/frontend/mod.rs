//! Server side of the web frontend: the provider stack it mounts and the
//! legacy route aliases it still honours.

pub mod providers;
pub mod redirect;

use axum::Router;

pub use providers::{ProviderComposition, ProviderScope, QueryClientConfig, ThemeProviderConfig};

/// `GET /ui/providers` plus the legacy redirects, mounted at the root.
pub fn router(providers: ProviderComposition) -> Router {
    Router::new()
        .merge(providers::router(providers))
        .merge(redirect::router())
}
