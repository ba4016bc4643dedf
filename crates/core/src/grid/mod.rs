//! The variation table workflow.
//!
//! - [`filter`] - attribute-based filtering of variations
//! - [`projection`] - rows, filter selectors and prefill for the editable grid
//! - [`bulk`] - applying a submitted bulk edit back onto the catalog
//! - [`sku`] - SKU suggestions from row labels
//! - [`request`] - the per-request context built at the HTTP boundary
//!
//! [`VariationGrid`] ties the read side together: load a product and its
//! variations, filter them, then project rows for display.

pub mod bulk;
pub mod filter;
pub mod projection;
pub mod request;
pub mod sku;

use std::collections::HashMap;

use thiserror::Error;

use crate::catalog::{AssetResolver, CatalogError, CatalogStore};
use crate::types::{ImageId, Product, ProductId, Variation, VariationId};

pub use bulk::{BulkEdit, BulkOutcome, FailedVariation, VariationEdit, apply};
pub use filter::{FilterCriteria, filter};
pub use projection::{FilterSelector, GridPrefill, RowViewModel, SelectorOption, project, selectors};
pub use request::RequestContext;
pub use sku::suggest;

/// Errors raised by the variation table workflow.
#[derive(Debug, Error)]
pub enum GridError {
    /// A required request parameter is absent.
    #[error("missing required parameter: {0}")]
    MissingRequiredParameter(&'static str),

    /// A request parameter could not be interpreted.
    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: String },

    /// The product does not exist.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// The product exists but has no variations to manage.
    #[error("product {0} is not a variable product")]
    ProductNotVariable(ProductId),

    /// A single variation could not be saved.
    #[error("variation {id} could not be saved: {source}")]
    VariationPersistFailure {
        id: VariationId,
        #[source]
        source: CatalogError,
    },

    /// The catalog could not be read.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl GridError {
    /// Whether the error ends the request with an informational page rather
    /// than a failure.
    #[must_use]
    pub const fn is_terminal_notice(&self) -> bool {
        matches!(
            self,
            Self::MissingRequiredParameter(_) | Self::ProductNotFound(_) | Self::ProductNotVariable(_)
        )
    }
}

/// A product's variations, loaded and filtered for display.
#[derive(Debug, Clone)]
pub struct VariationGrid {
    pub product: Product,
    pub criteria: FilterCriteria,
    /// Variations passing the filter, in child order.
    pub variations: Vec<Variation>,
    /// Number of child variations before filtering.
    pub total: usize,
    terms: HashMap<String, Vec<String>>,
}

impl VariationGrid {
    /// Load a variable product's variations and apply the request's filter.
    ///
    /// Child IDs the catalog cannot resolve are skipped.
    ///
    /// # Errors
    ///
    /// Returns `GridError::ProductNotFound`, `GridError::ProductNotVariable`,
    /// or `GridError::Catalog` if the catalog cannot be read.
    #[tracing::instrument(skip(store, ctx))]
    pub async fn load<S: CatalogStore>(
        store: &S,
        product_id: ProductId,
        ctx: &RequestContext,
    ) -> Result<Self, GridError> {
        let product = store
            .get_product(product_id)
            .await?
            .ok_or(GridError::ProductNotFound(product_id))?;
        if !product.is_variable() {
            return Err(GridError::ProductNotVariable(product_id));
        }

        let children = store.list_child_variation_ids(product_id).await?;
        let total = children.len();
        let mut variations = Vec::with_capacity(total);
        for id in children {
            match store.get_variation(id).await? {
                Some(variation) => variations.push(variation),
                None => tracing::warn!(variation_id = %id, "Skipping missing child variation"),
            }
        }

        let mut terms = HashMap::new();
        for attribute in product.attributes.iter().filter(|a| a.is_enumerated()) {
            let values = store.list_attribute_terms(&attribute.name).await?;
            terms.insert(attribute.name.clone(), values);
        }

        let criteria = ctx.filter_criteria(&product);
        let variations = filter(variations, &criteria);
        tracing::debug!(total, shown = variations.len(), "Variation grid loaded");

        Ok(Self {
            product,
            criteria,
            variations,
            total,
            terms,
        })
    }

    /// Images the rendered page needs thumbnails for.
    #[must_use]
    pub fn image_ids(&self, prefill: &GridPrefill) -> Vec<ImageId> {
        let mut ids: Vec<ImageId> = self
            .variations
            .iter()
            .filter_map(|v| v.image_id)
            .chain(prefill.image_id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Grid rows with the prefill stamped on.
    #[must_use]
    pub fn rows(&self, assets: &impl AssetResolver, prefill: &GridPrefill) -> Vec<RowViewModel> {
        self.variations
            .iter()
            .map(|variation| {
                let mut row = project(variation, &self.product, assets);
                prefill.apply(&mut row, assets);
                row
            })
            .collect()
    }

    /// Filter dropdowns reflecting the current criteria.
    #[must_use]
    pub fn selectors(&self) -> Vec<FilterSelector> {
        selectors(&self.product, &self.terms, &self.criteria)
    }
}
