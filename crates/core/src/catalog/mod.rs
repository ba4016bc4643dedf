//! Catalog store interface.
//!
//! The catalog owns products and variations. The variation table reads
//! through [`CatalogStore`] and writes back with
//! [`CatalogStore::save_variation`]; it never creates or deletes records.
//!
//! Implementations:
//! - [`MemoryCatalog`] - in-process store used by tests and demos
//! - `PgCatalogStore` in the admin crate - `PostgreSQL` via sqlx

pub mod memory;

use std::collections::HashMap;
use std::future::Future;

use thiserror::Error;

use crate::types::{ImageId, Product, ProductId, Variation, VariationId, parse_regular_price};

pub use memory::MemoryCatalog;

/// Message used when a SKU collides with another variation.
pub const DUPLICATE_SKU_MESSAGE: &str = "Invalid or duplicated SKU.";

/// Errors reported by a catalog store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The record does not exist.
    #[error("not found")]
    NotFound,

    /// The record was rejected by catalog validation.
    #[error("{0}")]
    Validation(String),

    /// A uniqueness constraint was violated.
    #[error("{0}")]
    Conflict(String),

    /// The storage backend failed.
    #[error("catalog backend error: {0}")]
    Backend(String),
}

/// Read/write access to products and variations.
///
/// Methods return `Send` futures so stores can be used from axum handlers.
pub trait CatalogStore: Send + Sync {
    /// Fetch a product with its attribute definitions and child IDs.
    fn get_product(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Option<Product>, CatalogError>> + Send;

    /// Fetch a single variation.
    fn get_variation(
        &self,
        id: VariationId,
    ) -> impl Future<Output = Result<Option<Variation>, CatalogError>> + Send;

    /// Child variation IDs of a product, in menu order.
    fn list_child_variation_ids(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<Vec<VariationId>, CatalogError>> + Send;

    /// Persist a variation's SKU, regular price and image.
    fn save_variation(
        &self,
        variation: &Variation,
    ) -> impl Future<Output = Result<(), CatalogError>> + Send;

    /// Term names of a taxonomy-backed attribute, in term order.
    fn list_attribute_terms(
        &self,
        attribute_name: &str,
    ) -> impl Future<Output = Result<Vec<String>, CatalogError>> + Send;

    /// All products, ordered by name.
    fn list_products(&self) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;
}

/// Resolves image references to displayable thumbnail URLs.
pub trait AssetResolver {
    fn thumbnail_url(&self, image_id: ImageId) -> Option<String>;
}

impl AssetResolver for HashMap<ImageId, String> {
    fn thumbnail_url(&self, image_id: ImageId) -> Option<String> {
        self.get(&image_id).cloned()
    }
}

/// Resolver for pages that show no images.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl AssetResolver for NoAssets {
    fn thumbnail_url(&self, _image_id: ImageId) -> Option<String> {
        None
    }
}

/// Field checks every store applies before persisting a variation.
///
/// SKU uniqueness is checked by the store itself since it needs the other
/// records.
///
/// # Errors
///
/// Returns `CatalogError::Validation` for a malformed price.
pub fn validate_variation(variation: &Variation) -> Result<(), CatalogError> {
    parse_regular_price(&variation.regular_price)
        .map_err(|e| CatalogError::Validation(e.to_string()))?;
    Ok(())
}
