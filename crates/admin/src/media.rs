//! Thumbnail URL resolution for grid rows.

use std::collections::HashMap;

use url::Url;

use variation_table_core::ImageId;
use variation_table_core::catalog::AssetResolver;

/// Thumbnails fetched for one page render.
///
/// Stored paths that are already absolute URLs are used as-is. Relative
/// paths are joined onto the configured media base URL, or served
/// unchanged when none is set.
#[derive(Debug, Clone, Default)]
pub struct MediaLibrary {
    base_url: Option<Url>,
    thumbnails: HashMap<ImageId, String>,
}

impl MediaLibrary {
    #[must_use]
    pub const fn new(base_url: Option<Url>, thumbnails: HashMap<ImageId, String>) -> Self {
        Self {
            base_url,
            thumbnails,
        }
    }

    fn resolve(&self, path: &str) -> String {
        if Url::parse(path).is_ok() {
            return path.to_string();
        }
        match &self.base_url {
            Some(base) => base
                .join(path.trim_start_matches('/'))
                .map_or_else(|_| path.to_string(), String::from),
            None => path.to_string(),
        }
    }
}

impl AssetResolver for MediaLibrary {
    fn thumbnail_url(&self, image_id: ImageId) -> Option<String> {
        self.thumbnails.get(&image_id).map(|path| self.resolve(path))
    }
}
