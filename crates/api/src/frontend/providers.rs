//! Provider stack the web frontend mounts around every page.
//!
//! The order is fixed: the theme provider wraps the query-cache provider, so
//! theming never depends on query state. [`ProviderComposition::new`] is the
//! only constructor and enforces that order.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::response::DataResponse;

/// Theme provider settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeProviderConfig {
    /// Element attribute the theme is written to.
    pub attribute: &'static str,
    pub default_theme: &'static str,
    pub enable_system: bool,
    pub disable_transition_on_change: bool,
}

impl Default for ThemeProviderConfig {
    fn default() -> Self {
        Self {
            attribute: "class",
            default_theme: "system",
            enable_system: true,
            disable_transition_on_change: true,
        }
    }
}

/// Query-cache defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryClientConfig {
    pub stale_time_ms: u64,
    pub refetch_on_window_focus: bool,
    pub retry: u32,
}

impl Default for QueryClientConfig {
    fn default() -> Self {
        Self {
            stale_time_ms: 60_000,
            refetch_on_window_focus: false,
            retry: 1,
        }
    }
}

/// One provider layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", content = "config", rename_all = "camelCase")]
pub enum ProviderScope {
    Theme(ThemeProviderConfig),
    Query(QueryClientConfig),
}

impl ProviderScope {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Theme(_) => "theme",
            Self::Query(_) => "query",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("expected providers [theme, query] outermost first, got {0:?}")]
    WrongOrder(Vec<&'static str>),
}

/// Ordered provider stack, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProviderComposition(Vec<ProviderScope>);

impl ProviderComposition {
    /// Accepts exactly `[Theme, Query]`.
    pub fn new(scopes: Vec<ProviderScope>) -> Result<Self, ProviderError> {
        match scopes.as_slice() {
            [ProviderScope::Theme(_), ProviderScope::Query(_)] => Ok(Self(scopes)),
            _ => Err(ProviderError::WrongOrder(
                scopes.iter().map(ProviderScope::name).collect(),
            )),
        }
    }

    /// The stack every page mounts.
    pub fn standard() -> Self {
        Self(vec![
            ProviderScope::Theme(ThemeProviderConfig::default()),
            ProviderScope::Query(QueryClientConfig::default()),
        ])
    }

    pub fn scopes(&self) -> &[ProviderScope] {
        &self.0
    }
}

/// GET /ui/providers
async fn get_providers(
    State(providers): State<ProviderComposition>,
) -> Json<DataResponse<ProviderComposition>> {
    Json(DataResponse { data: providers })
}

pub fn router(providers: ProviderComposition) -> Router {
    Router::new()
        .route("/ui/providers", get(get_providers))
        .with_state(providers)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn theme() -> ProviderScope {
        ProviderScope::Theme(ThemeProviderConfig::default())
    }

    fn query() -> ProviderScope {
        ProviderScope::Query(QueryClientConfig::default())
    }

    #[test]
    fn theme_then_query_is_accepted() {
        let composition = ProviderComposition::new(vec![theme(), query()]).unwrap();
        assert_eq!(composition, ProviderComposition::standard());
    }

    #[test]
    fn other_orders_are_rejected() {
        assert_matches!(
            ProviderComposition::new(vec![query(), theme()]),
            Err(ProviderError::WrongOrder(names)) if names == vec!["query", "theme"]
        );
        assert!(ProviderComposition::new(vec![theme(), theme(), query()]).is_err());
        assert!(ProviderComposition::new(vec![theme()]).is_err());
        assert!(ProviderComposition::new(vec![]).is_err());
    }

    #[test]
    fn serializes_outermost_first() {
        let value = serde_json::to_value(ProviderComposition::standard()).unwrap();
        assert_eq!(value[0]["scope"], "theme");
        assert_eq!(
            value[0]["config"],
            json!({
                "attribute": "class",
                "defaultTheme": "system",
                "enableSystem": true,
                "disableTransitionOnChange": true,
            })
        );
        assert_eq!(value[1]["scope"], "query");
        assert_eq!(value[1]["config"]["refetchOnWindowFocus"], false);
    }
}
