//! Admin notices and the informational page.

use askama::Template;
use askama_web::WebTemplate;

use variation_table_core::grid::{BulkOutcome, GridError};

pub const PRODUCT_ID_MISSING: &str = "Product ID not provided.";
pub const PRODUCT_NOT_VARIABLE: &str =
    "Invalid product ID or the product is not a variable product.";
pub const VARIATIONS_UPDATED: &str = "Variations updated successfully.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NoticeKind {
    /// CSS modifier class.
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Success => "notice-success",
            Self::Error => "notice-error",
            Self::Warning => "notice-warning",
            Self::Info => "notice-info",
        }
    }
}

/// A message shown above the page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    /// Notice for a request that cannot show a grid, if `err` is one of those.
    #[must_use]
    pub fn for_terminal(err: &GridError) -> Option<Self> {
        match err {
            GridError::MissingRequiredParameter(_) => Some(Self::info(PRODUCT_ID_MISSING)),
            GridError::ProductNotFound(_) | GridError::ProductNotVariable(_) => {
                Some(Self::info(PRODUCT_NOT_VARIABLE))
            }
            _ => None,
        }
    }

    /// Success notice followed by one error per failed variation.
    #[must_use]
    pub fn for_outcome(outcome: &BulkOutcome) -> Vec<Self> {
        let saved = outcome.updated.len();
        let total = saved + outcome.failed.len();
        let mut notices = vec![Self::success(format!(
            "{VARIATIONS_UPDATED} {saved} of {total} saved."
        ))];
        notices.extend(outcome.failed.iter().map(|failed| {
            Self::error(format!(
                "Variation #{} could not be saved: {}",
                failed.id, failed.reason
            ))
        }));
        notices
    }
}

/// Informational page for requests that end without a grid.
#[derive(Template, WebTemplate)]
#[template(path = "notice.html")]
pub struct NoticePageTemplate {
    pub current_path: String,
    pub notices: Vec<Notice>,
}
