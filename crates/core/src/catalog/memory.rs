//! In-process catalog store.
//!
//! Keeps everything behind one mutex. Besides backing tests and demos it
//! records every `save_variation` call and can be told to reject saves for
//! specific variations, which is how partial-failure behaviour is exercised.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use super::{AssetResolver, CatalogError, CatalogStore, DUPLICATE_SKU_MESSAGE, validate_variation};
use crate::types::{ImageId, Product, ProductId, Variation, VariationId};

#[derive(Debug, Default)]
struct Inner {
    products: BTreeMap<ProductId, Product>,
    variations: HashMap<VariationId, Variation>,
    terms: HashMap<String, Vec<String>>,
    media: HashMap<ImageId, String>,
    failing: HashMap<VariationId, String>,
    save_log: Vec<VariationId>,
}

/// A catalog held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    inner: Mutex<Inner>,
}

impl MemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, CatalogError> {
        self.inner
            .lock()
            .map_err(|_| CatalogError::Backend("catalog lock poisoned".to_owned()))
    }

    /// Insert or replace a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Backend` if the store lock is poisoned.
    pub fn insert_product(&self, product: Product) -> Result<(), CatalogError> {
        self.lock()?.products.insert(product.id, product);
        Ok(())
    }

    /// Insert or replace a variation, appending it to its product's children.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Backend` if the store lock is poisoned.
    pub fn insert_variation(&self, variation: Variation) -> Result<(), CatalogError> {
        let mut inner = self.lock()?;
        if let Some(product) = inner.products.get_mut(&variation.product_id) {
            if !product.children.contains(&variation.id) {
                product.children.push(variation.id);
            }
        }
        inner.variations.insert(variation.id, variation);
        Ok(())
    }

    /// Set the term list of a taxonomy-backed attribute.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Backend` if the store lock is poisoned.
    pub fn set_terms<I, S>(&self, attribute_name: &str, terms: I) -> Result<(), CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lock()?.terms.insert(
            attribute_name.to_owned(),
            terms.into_iter().map(Into::into).collect(),
        );
        Ok(())
    }

    /// Register a thumbnail URL for an image.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Backend` if the store lock is poisoned.
    pub fn insert_media(&self, image_id: ImageId, url: &str) -> Result<(), CatalogError> {
        self.lock()?.media.insert(image_id, url.to_owned());
        Ok(())
    }

    /// Make every save of `id` fail with a validation error.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Backend` if the store lock is poisoned.
    pub fn fail_saves_for(&self, id: VariationId, reason: &str) -> Result<(), CatalogError> {
        self.lock()?.failing.insert(id, reason.to_owned());
        Ok(())
    }

    /// IDs passed to `save_variation`, in call order, including failed saves.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Backend` if the store lock is poisoned.
    pub fn save_log(&self) -> Result<Vec<VariationId>, CatalogError> {
        Ok(self.lock()?.save_log.clone())
    }

    /// Thumbnail URLs for the requested images that have media.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Backend` if the store lock is poisoned.
    pub fn thumbnails(&self, ids: &[ImageId]) -> Result<HashMap<ImageId, String>, CatalogError> {
        let inner = self.lock()?;
        Ok(ids
            .iter()
            .filter_map(|id| inner.media.get(id).map(|url| (*id, url.clone())))
            .collect())
    }

    fn save(&self, variation: &Variation) -> Result<(), CatalogError> {
        let mut inner = self.lock()?;
        inner.save_log.push(variation.id);

        if let Some(reason) = inner.failing.get(&variation.id) {
            return Err(CatalogError::Validation(reason.clone()));
        }
        if !inner.variations.contains_key(&variation.id) {
            return Err(CatalogError::NotFound);
        }
        validate_variation(variation)?;

        if !variation.sku.is_empty()
            && inner
                .variations
                .values()
                .any(|other| other.id != variation.id && other.sku == variation.sku)
        {
            return Err(CatalogError::Conflict(DUPLICATE_SKU_MESSAGE.to_owned()));
        }

        // Only the editable fields are persisted, like the SQL store.
        if let Some(stored) = inner.variations.get_mut(&variation.id) {
            stored.sku.clone_from(&variation.sku);
            stored.regular_price.clone_from(&variation.regular_price);
            stored.image_id = variation.image_id;
        }
        Ok(())
    }
}

impl CatalogStore for MemoryCatalog {
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        Ok(self.lock()?.products.get(&id).cloned())
    }

    async fn get_variation(&self, id: VariationId) -> Result<Option<Variation>, CatalogError> {
        Ok(self.lock()?.variations.get(&id).cloned())
    }

    async fn list_child_variation_ids(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<VariationId>, CatalogError> {
        Ok(self
            .lock()?
            .products
            .get(&product_id)
            .map(|p| p.children.clone())
            .unwrap_or_default())
    }

    async fn save_variation(&self, variation: &Variation) -> Result<(), CatalogError> {
        self.save(variation)
    }

    async fn list_attribute_terms(&self, attribute_name: &str) -> Result<Vec<String>, CatalogError> {
        Ok(self
            .lock()?
            .terms
            .get(attribute_name)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        let mut products: Vec<Product> = self.lock()?.products.values().cloned().collect();
        products.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(products)
    }
}

impl AssetResolver for MemoryCatalog {
    fn thumbnail_url(&self, image_id: ImageId) -> Option<String> {
        self.lock().ok()?.media.get(&image_id).cloned()
    }
}
