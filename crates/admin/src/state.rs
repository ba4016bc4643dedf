//! Application state shared across handlers.

use std::sync::Arc;

use url::Url;

use crate::catalog::Catalog;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    catalog: Catalog,
    media_base_url: Option<Url>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `catalog` - Catalog backend
    /// * `media_base_url` - Prefix for relative thumbnail paths
    #[must_use]
    pub fn new(catalog: Catalog, media_base_url: Option<Url>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                catalog,
                media_base_url,
            }),
        }
    }

    /// Get a reference to the catalog backend.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get the media base URL, if configured.
    #[must_use]
    pub fn media_base_url(&self) -> Option<&Url> {
        self.inner.media_base_url.as_ref()
    }
}
