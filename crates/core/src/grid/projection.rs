//! Projection of catalog records into grid view models.
//!
//! Everything here is pure: the same inputs always produce the same rows and
//! selectors, and nothing is written back to the catalog.

use std::collections::HashMap;

use serde::Serialize;

use super::filter::FilterCriteria;
use super::sku::suggest;
use crate::catalog::AssetResolver;
use crate::types::{AttributeKind, ImageId, Product, Variation, VariationId};

/// Separator between attribute values in a row label.
pub const LABEL_SEPARATOR: &str = ", ";

/// One editable grid row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowViewModel {
    pub variation_id: VariationId,
    pub label: String,
    /// Thumbnail for the preview image, if the image resolves.
    pub image_url: Option<String>,
    /// Value of the hidden image field.
    pub image_id: Option<ImageId>,
    pub sku: String,
    pub price: String,
}

/// Attribute values in the product's declaration order, joined with `", "`.
///
/// Empty or missing values still produce a segment, so a variation with an
/// "any" attribute yields labels like `"Red, "`.
#[must_use]
pub fn row_label(variation: &Variation, product: &Product) -> String {
    product
        .attributes
        .iter()
        .map(|attribute| variation.attribute(&attribute.name).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(LABEL_SEPARATOR)
}

/// Project a variation into its grid row.
#[must_use]
pub fn project(
    variation: &Variation,
    product: &Product,
    assets: &impl AssetResolver,
) -> RowViewModel {
    RowViewModel {
        variation_id: variation.id,
        label: row_label(variation, product),
        image_url: variation.image_id.and_then(|id| assets.thumbnail_url(id)),
        image_id: variation.image_id,
        sku: variation.sku.clone(),
        price: variation.regular_price.clone(),
    }
}

/// Values to stamp onto every row before the form is shown.
///
/// Nothing is saved until the operator submits the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridPrefill {
    /// Base for generated SKUs.
    pub sku_base: Option<String>,
    /// Price for every row.
    pub price: Option<String>,
    /// Image for every row.
    pub image_id: Option<ImageId>,
}

impl GridPrefill {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.sku_base.is_none() && self.price.is_none() && self.image_id.is_none()
    }

    /// Overwrite the prefilled fields of `row`.
    ///
    /// Generated SKUs are upper-cased.
    pub fn apply(&self, row: &mut RowViewModel, assets: &impl AssetResolver) {
        if let Some(base) = &self.sku_base {
            row.sku = suggest(base, &row.label).to_uppercase();
        }
        if let Some(price) = &self.price {
            row.price.clone_from(price);
        }
        if let Some(image_id) = self.image_id {
            row.image_id = Some(image_id);
            row.image_url = assets.thumbnail_url(image_id);
        }
    }
}

/// One option of a filter dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorOption {
    pub value: String,
    pub selected: bool,
}

/// A filter dropdown for one product attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSelector {
    /// Query key (the attribute name).
    pub name: String,
    pub label: String,
    pub options: Vec<SelectorOption>,
}

/// Build one selector per product attribute.
///
/// Enumerated attributes take their options from `terms` (keyed by attribute
/// name); freeform attributes use their inline options. The option equal to
/// the current criteria value is marked selected.
#[must_use]
pub fn selectors(
    product: &Product,
    terms: &HashMap<String, Vec<String>>,
    criteria: &FilterCriteria,
) -> Vec<FilterSelector> {
    product
        .attributes
        .iter()
        .map(|attribute| {
            let values: &[String] = match &attribute.kind {
                AttributeKind::Enumerated => terms
                    .get(&attribute.name)
                    .map(Vec::as_slice)
                    .unwrap_or_default(),
                AttributeKind::Freeform { options } => options,
            };
            let current = criteria.get(&attribute.name);
            FilterSelector {
                name: attribute.name.clone(),
                label: attribute.label.clone(),
                options: values
                    .iter()
                    .map(|value| SelectorOption {
                        value: value.clone(),
                        selected: current == Some(value.as_str()),
                    })
                    .collect(),
            }
        })
        .collect()
}
