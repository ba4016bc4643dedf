//! The catalog backend the admin panel talks to.
//!
//! Production runs against `PostgreSQL`; the in-memory store backs tests and
//! local demos without a database.

use std::collections::HashMap;
use std::sync::Arc;

use variation_table_core::catalog::{CatalogError, CatalogStore, MemoryCatalog};
use variation_table_core::{ImageId, Product, ProductId, Variation, VariationId};

use crate::db::{MediaRepository, PgCatalogStore};

/// Catalog backend selected at startup.
#[derive(Debug, Clone)]
pub enum Catalog {
    Postgres(PgCatalogStore),
    Memory(Arc<MemoryCatalog>),
}

impl Catalog {
    /// Stored thumbnail paths for the given images.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Backend` if the lookup fails.
    pub async fn thumbnails(
        &self,
        ids: &[ImageId],
    ) -> Result<HashMap<ImageId, String>, CatalogError> {
        match self {
            Self::Postgres(store) => Ok(MediaRepository::new(store.pool())
                .thumbnails(ids)
                .await?),
            Self::Memory(store) => store.thumbnails(ids),
        }
    }

    /// Whether the backend can serve requests.
    pub async fn ping(&self) -> bool {
        match self {
            Self::Postgres(store) => sqlx::query("SELECT 1")
                .fetch_one(store.pool())
                .await
                .is_ok(),
            Self::Memory(_) => true,
        }
    }
}

impl From<MemoryCatalog> for Catalog {
    fn from(store: MemoryCatalog) -> Self {
        Self::Memory(Arc::new(store))
    }
}

impl CatalogStore for Catalog {
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        match self {
            Self::Postgres(store) => store.get_product(id).await,
            Self::Memory(store) => store.get_product(id).await,
        }
    }

    async fn get_variation(&self, id: VariationId) -> Result<Option<Variation>, CatalogError> {
        match self {
            Self::Postgres(store) => store.get_variation(id).await,
            Self::Memory(store) => store.get_variation(id).await,
        }
    }

    async fn list_child_variation_ids(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<VariationId>, CatalogError> {
        match self {
            Self::Postgres(store) => store.list_child_variation_ids(product_id).await,
            Self::Memory(store) => store.list_child_variation_ids(product_id).await,
        }
    }

    async fn save_variation(&self, variation: &Variation) -> Result<(), CatalogError> {
        match self {
            Self::Postgres(store) => store.save_variation(variation).await,
            Self::Memory(store) => store.save_variation(variation).await,
        }
    }

    async fn list_attribute_terms(&self, attribute_name: &str) -> Result<Vec<String>, CatalogError> {
        match self {
            Self::Postgres(store) => store.list_attribute_terms(attribute_name).await,
            Self::Memory(store) => store.list_attribute_terms(attribute_name).await,
        }
    }

    async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        match self {
            Self::Postgres(store) => store.list_products().await,
            Self::Memory(store) => store.list_products().await,
        }
    }
}
