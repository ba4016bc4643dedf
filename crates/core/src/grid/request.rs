//! Immutable view of one variation table request.

use super::GridError;
use super::bulk::{BulkEdit, parse_int_lenient};
use super::filter::FilterCriteria;
use super::projection::GridPrefill;
use crate::types::{ImageId, Product, ProductId, parse_regular_price};

/// Query key carrying the product being managed.
pub const PRODUCT_ID_PARAM: &str = "product_id";
/// Query key for SKU generation from a base SKU.
pub const SKU_BASE_PARAM: &str = "sku_base";
/// Query key for a price stamped onto every row.
pub const BULK_PRICE_PARAM: &str = "bulk_price";
/// Query key for an image stamped onto every row.
pub const BULK_IMAGE_PARAM: &str = "bulk_image";

/// Query parameters and (for submissions) form fields, captured once at the
/// HTTP boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    query: Vec<(String, String)>,
    form: Option<Vec<(String, String)>>,
}

impl RequestContext {
    #[must_use]
    pub const fn new(query: Vec<(String, String)>, form: Option<Vec<(String, String)>>) -> Self {
        Self { query, form }
    }

    /// Last value of a query parameter.
    #[must_use]
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn non_empty(&self, name: &str) -> Option<&str> {
        self.query_value(name)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// The product being managed.
    ///
    /// # Errors
    ///
    /// Returns `GridError::MissingRequiredParameter` when `product_id` is
    /// absent and `GridError::InvalidParameter` when it is not an integer.
    pub fn product_id(&self) -> Result<ProductId, GridError> {
        let raw = self
            .query_value(PRODUCT_ID_PARAM)
            .ok_or(GridError::MissingRequiredParameter(PRODUCT_ID_PARAM))?;
        raw.parse().map_err(|_| GridError::InvalidParameter {
            name: PRODUCT_ID_PARAM,
            value: raw.to_owned(),
        })
    }

    /// Filter constraints for `product`.
    ///
    /// Only query keys naming one of the product's attributes count.
    #[must_use]
    pub fn filter_criteria(&self, product: &Product) -> FilterCriteria {
        let mut criteria = FilterCriteria::new();
        for attribute in &product.attributes {
            if let Some(value) = self.query_value(&attribute.name) {
                criteria.insert(&attribute.name, value);
            }
        }
        criteria
    }

    /// Row prefill requested through the query string.
    ///
    /// Unusable values are dropped and reported alongside the prefill so the
    /// page can still render.
    #[must_use]
    pub fn prefill(&self) -> (GridPrefill, Vec<GridError>) {
        let mut rejected = Vec::new();

        let sku_base = self.non_empty(SKU_BASE_PARAM).map(str::to_owned);

        let price = self.non_empty(BULK_PRICE_PARAM).and_then(|raw| {
            match parse_regular_price(raw) {
                Ok(_) => Some(raw.to_owned()),
                Err(e) => {
                    rejected.push(GridError::InvalidParameter {
                        name: BULK_PRICE_PARAM,
                        value: e.to_string(),
                    });
                    None
                }
            }
        });

        let image_id = self.non_empty(BULK_IMAGE_PARAM).and_then(|raw| {
            let id = parse_int_lenient(raw);
            if id > 0 {
                Some(ImageId::new(id))
            } else {
                rejected.push(GridError::InvalidParameter {
                    name: BULK_IMAGE_PARAM,
                    value: raw.to_owned(),
                });
                None
            }
        });

        (
            GridPrefill {
                sku_base,
                price,
                image_id,
            },
            rejected,
        )
    }

    /// The bulk edit carried by a submission, if this is one.
    ///
    /// `None` for plain page views and for submissions without the submit
    /// marker.
    #[must_use]
    pub fn bulk_edit(&self) -> Option<BulkEdit> {
        self.form.as_deref().and_then(BulkEdit::from_form)
    }
}
