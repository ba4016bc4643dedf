//! Product variations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::id::{ImageId, ProductId, VariationId};

/// A concrete, purchasable combination of attribute values.
///
/// Variations are owned by the catalog. The variation table only ever
/// changes the SKU, regular price and image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variation {
    pub id: VariationId,
    pub product_id: ProductId,
    /// Attribute name to assigned value. An empty value means "any".
    pub attributes: BTreeMap<String, String>,
    /// May be empty.
    pub sku: String,
    /// Decimal as text, may be empty.
    pub regular_price: String,
    pub image_id: Option<ImageId>,
}

impl Variation {
    /// Create a variation with no SKU, price or image.
    #[must_use]
    pub fn new(id: VariationId, product_id: ProductId) -> Self {
        Self {
            id,
            product_id,
            attributes: BTreeMap::new(),
            sku: String::new(),
            regular_price: String::new(),
            image_id: None,
        }
    }

    /// Builder-style attribute assignment.
    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_owned(), value.to_owned());
        self
    }

    /// The value assigned for `name`, if the variation has one.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_sku(&mut self, sku: impl Into<String>) {
        self.sku = sku.into();
    }

    pub fn set_regular_price(&mut self, price: impl Into<String>) {
        self.regular_price = price.into();
    }

    /// Set the image from a raw attachment number. Zero or negative clears it.
    pub fn set_image_id(&mut self, raw: i64) {
        self.image_id = (raw > 0).then(|| ImageId::new(raw));
    }
}
