//! Bulk partial updates of a product's variations.
//!
//! # Form Fields
//!
//! ```text
//! save_variations          - submit marker, required for anything to happen
//! variation_sku_<id>       - new SKU (text)
//! variation_price_<id>     - new regular price (decimal text)
//! variation_image_<id>     - new image attachment (integer, 0 clears)
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use super::GridError;
use crate::catalog::CatalogStore;
use crate::types::{ProductId, VariationId};

/// Name of the submit button that marks a bulk save.
pub const SUBMIT_MARKER: &str = "save_variations";
pub const SKU_FIELD_PREFIX: &str = "variation_sku_";
pub const PRICE_FIELD_PREFIX: &str = "variation_price_";
pub const IMAGE_FIELD_PREFIX: &str = "variation_image_";

/// Requested changes for one variation. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariationEdit {
    pub sku: Option<String>,
    pub price: Option<String>,
    /// Raw attachment number; zero or negative clears the image.
    pub image_id: Option<i64>,
}

impl VariationEdit {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.sku.is_none() && self.price.is_none() && self.image_id.is_none()
    }

    fn apply_to(&self, variation: &mut crate::types::Variation) {
        if let Some(sku) = &self.sku {
            variation.set_sku(sku.as_str());
        }
        if let Some(price) = &self.price {
            variation.set_regular_price(price.as_str());
        }
        if let Some(image_id) = self.image_id {
            variation.set_image_id(image_id);
        }
    }
}

/// Per-variation edits from one form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkEdit {
    edits: BTreeMap<VariationId, VariationEdit>,
}

impl BulkEdit {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse submitted form fields.
    ///
    /// Returns `None` when the submit marker is absent. Fields that do not
    /// follow the naming convention are ignored; a repeated field keeps its
    /// last value. SKU and price values are sanitized, image values are read
    /// like an integer conversion.
    #[must_use]
    pub fn from_form(fields: &[(String, String)]) -> Option<Self> {
        if !fields.iter().any(|(name, _)| name == SUBMIT_MARKER) {
            return None;
        }

        let mut bulk = Self::new();
        for (name, value) in fields {
            if let Some(id) = field_id(name, SKU_FIELD_PREFIX) {
                bulk.entry(id).sku = Some(sanitize_text_field(value));
            } else if let Some(id) = field_id(name, PRICE_FIELD_PREFIX) {
                bulk.entry(id).price = Some(sanitize_text_field(value));
            } else if let Some(id) = field_id(name, IMAGE_FIELD_PREFIX) {
                bulk.entry(id).image_id = Some(parse_int_lenient(value));
            }
        }
        Some(bulk)
    }

    /// Mutable access to the edit for `id`, creating an empty one.
    pub fn entry(&mut self, id: VariationId) -> &mut VariationEdit {
        self.edits.entry(id).or_default()
    }

    #[must_use]
    pub fn get(&self, id: VariationId) -> Option<&VariationEdit> {
        self.edits.get(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = VariationId> + '_ {
        self.edits.keys().copied()
    }
}

fn field_id(name: &str, prefix: &str) -> Option<VariationId> {
    name.strip_prefix(prefix)?.parse().ok()
}

/// A variation that could not be saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedVariation {
    pub id: VariationId,
    pub reason: String,
}

/// Result of one bulk apply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkOutcome {
    /// Saved variations, in child order.
    pub updated: Vec<VariationId>,
    /// Variations whose load or save failed, in child order.
    pub failed: Vec<FailedVariation>,
}

impl BulkOutcome {
    #[must_use]
    pub const fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Apply `edits` to every child variation of a product.
///
/// Every child is saved exactly once, in child order, whether or not the
/// submission touched it. A failed save is recorded and the remaining
/// children are still processed. Edits for IDs that are not children of the
/// product are ignored.
///
/// # Errors
///
/// Returns `GridError::ProductNotFound` or `GridError::ProductNotVariable`
/// without saving anything, and `GridError::Catalog` if the product or its
/// children cannot be read.
#[tracing::instrument(skip(edits, store), fields(edits = edits.len()))]
pub async fn apply<S: CatalogStore>(
    product_id: ProductId,
    edits: &BulkEdit,
    store: &S,
) -> Result<BulkOutcome, GridError> {
    let product = store
        .get_product(product_id)
        .await?
        .ok_or(GridError::ProductNotFound(product_id))?;
    if !product.is_variable() {
        return Err(GridError::ProductNotVariable(product_id));
    }

    let children = store.list_child_variation_ids(product_id).await?;

    let stray = edits.ids().filter(|id| !children.contains(id)).count();
    if stray > 0 {
        tracing::debug!(stray, "Ignoring edits for variations outside the product");
    }

    let mut outcome = BulkOutcome::default();
    for id in children {
        let mut variation = match store.get_variation(id).await {
            Ok(Some(variation)) => variation,
            Ok(None) => {
                tracing::warn!(variation_id = %id, "Child variation missing from catalog");
                outcome.failed.push(FailedVariation {
                    id,
                    reason: "variation not found".to_owned(),
                });
                continue;
            }
            Err(e) => {
                tracing::warn!(variation_id = %id, error = %e, "Failed to load variation");
                outcome.failed.push(FailedVariation {
                    id,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if let Some(edit) = edits.get(id) {
            edit.apply_to(&mut variation);
        }

        match store.save_variation(&variation).await {
            Ok(()) => outcome.updated.push(id),
            Err(source) => {
                let reason = source.to_string();
                let err = GridError::VariationPersistFailure { id, source };
                tracing::warn!(error = %err, "Variation save failed");
                outcome.failed.push(FailedVariation { id, reason });
            }
        }
    }

    tracing::info!(
        updated = outcome.updated.len(),
        failed = outcome.failed.len(),
        "Bulk variation update applied"
    );
    Ok(outcome)
}

/// Clean a single-line text value from a form.
///
/// Strips HTML tags and percent-encoded octets, turns tabs and line breaks
/// into spaces, collapses whitespace runs and trims the result.
#[must_use]
pub fn sanitize_text_field(value: &str) -> String {
    let stripped = strip_tags(value);
    let without_octets = strip_octets(&stripped);
    without_octets.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_tags(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find('<') {
        let (before, tail) = rest.split_at(start);
        out.push_str(before);
        let opens_tag = tail
            .chars()
            .nth(1)
            .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'));
        match tail.find('>') {
            Some(end) if opens_tag => rest = tail.get(end + 1..).unwrap_or_default(),
            _ => {
                out.push('<');
                rest = tail.get(1..).unwrap_or_default();
            }
        }
    }
    out.push_str(rest);
    out
}

fn strip_octets(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '%' {
            let mut lookahead = chars.clone();
            let is_octet = matches!(
                (lookahead.next(), lookahead.next()),
                (Some(a), Some(b)) if a.is_ascii_hexdigit() && b.is_ascii_hexdigit()
            );
            if is_octet {
                chars.next();
                chars.next();
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Read a leading integer the way loose integer conversion does: optional
/// surrounding whitespace and sign, then digits up to the first non-digit.
/// Anything unreadable is `0`; overflow saturates.
#[must_use]
pub fn parse_int_lenient(value: &str) -> i64 {
    let trimmed = value.trim_start();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = digits.get(..end).unwrap_or_default();
    if digits.is_empty() {
        return 0;
    }

    let signed = if negative {
        format!("-{digits}")
    } else {
        digits.to_owned()
    };
    signed
        .parse::<i64>()
        .unwrap_or(if negative { i64::MIN } else { i64::MAX })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogError, MemoryCatalog};
    use crate::types::{Attribute, ImageId, Product, ProductType, Variation};

    fn form(fields: &[(&str, &str)]) -> Vec<(String, String)> {
        fields
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    fn catalog(product_type: ProductType) -> MemoryCatalog {
        let catalog = MemoryCatalog::new();
        catalog
            .insert_product(Product {
                id: ProductId::new(1),
                name: "Hoodie".to_owned(),
                product_type,
                attributes: vec![Attribute::enumerated("pa_color", "Color")],
                children: Vec::new(),
            })
            .unwrap();
        for (id, color) in [(10, "Red"), (11, "Blue"), (12, "Green")] {
            let mut v = Variation::new(VariationId::new(id), ProductId::new(1))
                .with_attribute("pa_color", color);
            v.set_sku(format!("HD-{id}"));
            v.set_regular_price("20");
            v.set_image_id(100 + id);
            catalog.insert_variation(v).unwrap();
        }
        catalog
    }

    async fn stored(catalog: &MemoryCatalog, id: i64) -> Variation {
        catalog
            .get_variation(VariationId::new(id))
            .await
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_from_form_requires_marker() {
        let fields = form(&[("variation_sku_10", "NEW")]);
        assert!(BulkEdit::from_form(&fields).is_none());
    }

    #[test]
    fn test_from_form_collects_fields_by_id() {
        let fields = form(&[
            ("save_variations", "Save Changes"),
            ("variation_sku_10", " NEW "),
            ("variation_price_10", "12.50"),
            ("variation_image_11", "42"),
            ("page", "variation-table"),
            ("variation_sku_abc", "ignored"),
        ]);
        let bulk = BulkEdit::from_form(&fields).unwrap();
        assert_eq!(bulk.len(), 2);

        let first = bulk.get(VariationId::new(10)).unwrap();
        assert_eq!(first.sku.as_deref(), Some("NEW"));
        assert_eq!(first.price.as_deref(), Some("12.50"));
        assert_eq!(first.image_id, None);

        let second = bulk.get(VariationId::new(11)).unwrap();
        assert_eq!(second.image_id, Some(42));
        assert!(second.sku.is_none());
    }

    #[test]
    fn test_from_form_last_value_wins() {
        let fields = form(&[
            ("save_variations", ""),
            ("variation_sku_10", "A"),
            ("variation_sku_10", "B"),
        ]);
        let bulk = BulkEdit::from_form(&fields).unwrap();
        assert_eq!(bulk.get(VariationId::new(10)).unwrap().sku.as_deref(), Some("B"));
    }

    #[test]
    fn test_sanitize_text_field() {
        assert_eq!(sanitize_text_field("  HD-01  "), "HD-01");
        assert_eq!(sanitize_text_field("<b>HD</b>-01"), "HD-01");
        assert_eq!(sanitize_text_field("HD\t01\n"), "HD 01");
        assert_eq!(sanitize_text_field("a   b"), "a b");
        assert_eq!(sanitize_text_field("5 < 6"), "5 < 6");
        assert_eq!(sanitize_text_field("HD%20X"), "HDX");
        assert_eq!(sanitize_text_field("50%OFF"), "50%OFF");
        assert_eq!(sanitize_text_field("<script>x"), "x");
    }

    #[test]
    fn test_parse_int_lenient() {
        assert_eq!(parse_int_lenient("42"), 42);
        assert_eq!(parse_int_lenient(" 42abc"), 42);
        assert_eq!(parse_int_lenient("abc"), 0);
        assert_eq!(parse_int_lenient(""), 0);
        assert_eq!(parse_int_lenient("-7"), -7);
        assert_eq!(parse_int_lenient("+7"), 7);
        assert_eq!(parse_int_lenient("3.9"), 3);
        assert_eq!(parse_int_lenient("99999999999999999999"), i64::MAX);
    }

    #[tokio::test]
    async fn test_apply_missing_product_saves_nothing() {
        let catalog = catalog(ProductType::Variable);
        let err = apply(ProductId::new(99), &BulkEdit::new(), &catalog)
            .await
            .unwrap_err();
        assert!(matches!(err, GridError::ProductNotFound(_)));
        assert!(catalog.save_log().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_apply_non_variable_product_saves_nothing() {
        let catalog = catalog(ProductType::Simple);
        let mut edits = BulkEdit::new();
        edits.entry(VariationId::new(10)).sku = Some("NEW".to_owned());
        let err = apply(ProductId::new(1), &edits, &catalog).await.unwrap_err();
        assert!(matches!(err, GridError::ProductNotVariable(_)));
        assert!(catalog.save_log().unwrap().is_empty());
        assert_eq!(stored(&catalog, 10).await.sku, "HD-10");
    }

    #[tokio::test]
    async fn test_apply_partial_edit_saves_every_child_once() {
        let catalog = catalog(ProductType::Variable);
        let mut edits = BulkEdit::new();
        edits.entry(VariationId::new(11)).sku = Some("NEW".to_owned());

        let outcome = apply(ProductId::new(1), &edits, &catalog).await.unwrap();

        let all: Vec<_> = [10, 11, 12].into_iter().map(VariationId::new).collect();
        assert_eq!(catalog.save_log().unwrap(), all);
        assert_eq!(outcome.updated, all);
        assert!(outcome.is_complete_success());

        let edited = stored(&catalog, 11).await;
        assert_eq!(edited.sku, "NEW");
        assert_eq!(edited.regular_price, "20");
        assert_eq!(edited.image_id, Some(ImageId::new(111)));
        assert_eq!(stored(&catalog, 10).await.sku, "HD-10");
    }

    #[tokio::test]
    async fn test_apply_continues_after_failure() {
        let catalog = catalog(ProductType::Variable);
        catalog
            .fail_saves_for(VariationId::new(10), "Variation is locked")
            .unwrap();
        let mut edits = BulkEdit::new();
        edits.entry(VariationId::new(12)).price = Some("35".to_owned());

        let outcome = apply(ProductId::new(1), &edits, &catalog).await.unwrap();

        assert_eq!(catalog.save_log().unwrap().len(), 3);
        assert_eq!(
            outcome.failed,
            vec![FailedVariation {
                id: VariationId::new(10),
                reason: "Variation is locked".to_owned(),
            }]
        );
        assert_eq!(
            outcome.updated,
            vec![VariationId::new(11), VariationId::new(12)]
        );
        assert_eq!(stored(&catalog, 12).await.regular_price, "35");
    }

    #[tokio::test]
    async fn test_apply_reports_catalog_validation() {
        let catalog = catalog(ProductType::Variable);
        let mut edits = BulkEdit::new();
        edits.entry(VariationId::new(10)).sku = Some("HD-11".to_owned());
        edits.entry(VariationId::new(11)).price = Some("free".to_owned());

        let outcome = apply(ProductId::new(1), &edits, &catalog).await.unwrap();

        assert_eq!(outcome.updated, vec![VariationId::new(12)]);
        assert_eq!(outcome.failed.len(), 2);
        assert_eq!(
            outcome.failed[0].reason,
            CatalogError::Conflict(crate::catalog::DUPLICATE_SKU_MESSAGE.to_owned()).to_string()
        );
        assert!(outcome.failed[1].reason.starts_with("Invalid price"));
        assert_eq!(stored(&catalog, 10).await.sku, "HD-10");
    }

    #[tokio::test]
    async fn test_apply_image_zero_clears() {
        let catalog = catalog(ProductType::Variable);
        let fields = form(&[("save_variations", "1"), ("variation_image_10", "0")]);
        let edits = BulkEdit::from_form(&fields).unwrap();

        apply(ProductId::new(1), &edits, &catalog).await.unwrap();

        assert_eq!(stored(&catalog, 10).await.image_id, None);
        assert_eq!(stored(&catalog, 11).await.image_id, Some(ImageId::new(111)));
    }

    #[tokio::test]
    async fn test_apply_ignores_edits_for_other_products() {
        let catalog = catalog(ProductType::Variable);
        let mut edits = BulkEdit::new();
        edits.entry(VariationId::new(500)).sku = Some("STRAY".to_owned());

        let outcome = apply(ProductId::new(1), &edits, &catalog).await.unwrap();
        assert_eq!(outcome.updated.len(), 3);
        assert!(!catalog.save_log().unwrap().contains(&VariationId::new(500)));
    }
}
