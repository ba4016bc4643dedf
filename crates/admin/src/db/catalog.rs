//! Catalog repository for product and variation records.
//!
//! Queries are checked at runtime (`sqlx::query_as`) and decoded into
//! internal row types before being converted into core types.

use std::collections::HashMap;

use sqlx::PgPool;
use sqlx::types::Json;

use variation_table_core::catalog::{
    CatalogError, CatalogStore, DUPLICATE_SKU_MESSAGE, validate_variation,
};
use variation_table_core::{
    Attribute, AttributeKind, ImageId, Product, ProductId, ProductType, Variation, VariationId,
};

use super::{RepositoryError, id_array};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    product_type: String,
}

#[derive(Debug, sqlx::FromRow)]
struct AttributeRow {
    product_id: ProductId,
    name: String,
    label: String,
    is_taxonomy: bool,
    options: Json<Vec<String>>,
}

impl From<AttributeRow> for Attribute {
    fn from(row: AttributeRow) -> Self {
        let kind = if row.is_taxonomy {
            AttributeKind::Enumerated
        } else {
            AttributeKind::Freeform {
                options: row.options.0,
            }
        };
        Self {
            name: row.name,
            label: row.label,
            kind,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ChildRow {
    id: VariationId,
    product_id: ProductId,
}

#[derive(Debug, sqlx::FromRow)]
struct VariationRow {
    id: VariationId,
    product_id: ProductId,
    sku: String,
    regular_price: String,
    image_id: Option<ImageId>,
}

#[derive(Debug, sqlx::FromRow)]
struct VariationAttributeRow {
    attribute_name: String,
    value: String,
}

fn product_from_row(
    row: ProductRow,
    attributes: Vec<Attribute>,
    children: Vec<VariationId>,
) -> Result<Product, RepositoryError> {
    let product_type = row.product_type.parse::<ProductType>().map_err(|e| {
        RepositoryError::DataCorruption(format!("product {}: {e}", row.id))
    })?;
    Ok(Product {
        id: row.id,
        name: row.name,
        product_type,
        attributes,
        children,
    })
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for catalog database operations.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a product with its attributes and children.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if the product type is unknown.
    pub async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, product_type
            FROM catalog.product
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut attributes = self.attributes_for(&[id]).await?;
        let children = self.child_ids(id).await?;
        product_from_row(row, attributes.remove(&id).unwrap_or_default(), children).map(Some)
    }

    /// List every product ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if a product type is unknown.
    pub async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, product_type
            FROM catalog.product
            ORDER BY name, id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let ids: Vec<ProductId> = rows.iter().map(|r| r.id).collect();
        let mut attributes = self.attributes_for(&ids).await?;

        let child_rows = sqlx::query_as::<_, ChildRow>(
            r"
            SELECT id, product_id
            FROM catalog.variation
            WHERE product_id = ANY($1)
            ORDER BY product_id, position, id
            ",
        )
        .bind(id_array(&ids))
        .fetch_all(self.pool)
        .await?;

        let mut children: HashMap<ProductId, Vec<VariationId>> = HashMap::new();
        for child in child_rows {
            children.entry(child.product_id).or_default().push(child.id);
        }

        rows.into_iter()
            .map(|row| {
                let id = row.id;
                product_from_row(
                    row,
                    attributes.remove(&id).unwrap_or_default(),
                    children.remove(&id).unwrap_or_default(),
                )
            })
            .collect()
    }

    /// Attribute definitions for the given products, in declaration order.
    async fn attributes_for(
        &self,
        ids: &[ProductId],
    ) -> Result<HashMap<ProductId, Vec<Attribute>>, RepositoryError> {
        let rows = sqlx::query_as::<_, AttributeRow>(
            r"
            SELECT product_id, name, label, is_taxonomy, options
            FROM catalog.product_attribute
            WHERE product_id = ANY($1)
            ORDER BY product_id, position, name
            ",
        )
        .bind(id_array(ids))
        .fetch_all(self.pool)
        .await?;

        let mut grouped: HashMap<ProductId, Vec<Attribute>> = HashMap::new();
        for row in rows {
            grouped.entry(row.product_id).or_default().push(row.into());
        }
        Ok(grouped)
    }

    /// Child variation IDs in menu order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn child_ids(&self, product_id: ProductId) -> Result<Vec<VariationId>, RepositoryError> {
        let ids = sqlx::query_scalar::<_, VariationId>(
            r"
            SELECT id
            FROM catalog.variation
            WHERE product_id = $1
            ORDER BY position, id
            ",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;
        Ok(ids)
    }

    /// Get a variation with its attribute values.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_variation(&self, id: VariationId) -> Result<Option<Variation>, RepositoryError> {
        let row = sqlx::query_as::<_, VariationRow>(
            r"
            SELECT id, product_id, sku, regular_price, image_id
            FROM catalog.variation
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let values = sqlx::query_as::<_, VariationAttributeRow>(
            r"
            SELECT attribute_name, value
            FROM catalog.variation_attribute
            WHERE variation_id = $1
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(Variation {
            id: row.id,
            product_id: row.product_id,
            attributes: values
                .into_iter()
                .map(|v| (v.attribute_name, v.value))
                .collect(),
            sku: row.sku,
            regular_price: row.regular_price,
            image_id: row.image_id,
        }))
    }

    /// Persist the editable fields of a variation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the variation does not exist,
    /// `RepositoryError::Conflict` for a duplicated SKU,
    /// `RepositoryError::Rejected` for an unknown image, and
    /// `RepositoryError::Database` for any other failure.
    pub async fn update_variation(&self, variation: &Variation) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE catalog.variation
            SET sku = $2, regular_price = $3, image_id = $4, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(variation.id)
        .bind(&variation.sku)
        .bind(&variation.regular_price)
        .bind(variation.image_id)
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return RepositoryError::Conflict(DUPLICATE_SKU_MESSAGE.to_string());
                }
                if db.is_foreign_key_violation() {
                    return RepositoryError::Rejected(format!(
                        "Invalid image ID: {}",
                        variation.image_id.map_or(0, |id| id.as_i64())
                    ));
                }
            }
            RepositoryError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Term names of a taxonomy-backed attribute, in term order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn attribute_terms(&self, attribute_name: &str) -> Result<Vec<String>, RepositoryError> {
        let terms = sqlx::query_scalar::<_, String>(
            r"
            SELECT name
            FROM catalog.attribute_term
            WHERE attribute_name = $1
            ORDER BY position, name
            ",
        )
        .bind(attribute_name)
        .fetch_all(self.pool)
        .await?;
        Ok(terms)
    }
}

// =============================================================================
// Catalog Store
// =============================================================================

/// `PostgreSQL`-backed catalog store.
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn repo(&self) -> CatalogRepository<'_> {
        CatalogRepository::new(&self.pool)
    }
}

impl CatalogStore for PgCatalogStore {
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        Ok(self.repo().get_product(id).await?)
    }

    async fn get_variation(&self, id: VariationId) -> Result<Option<Variation>, CatalogError> {
        Ok(self.repo().get_variation(id).await?)
    }

    async fn list_child_variation_ids(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<VariationId>, CatalogError> {
        Ok(self.repo().child_ids(product_id).await?)
    }

    async fn save_variation(&self, variation: &Variation) -> Result<(), CatalogError> {
        validate_variation(variation)?;
        Ok(self.repo().update_variation(variation).await?)
    }

    async fn list_attribute_terms(&self, attribute_name: &str) -> Result<Vec<String>, CatalogError> {
        Ok(self.repo().attribute_terms(attribute_name).await?)
    }

    async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.repo().list_products().await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product_row(product_type: &str) -> ProductRow {
        ProductRow {
            id: ProductId::new(4),
            name: "Hoodie".to_string(),
            product_type: product_type.to_string(),
        }
    }

    #[test]
    fn test_taxonomy_row_becomes_enumerated() {
        let attribute: Attribute = AttributeRow {
            product_id: ProductId::new(4),
            name: "pa_color".to_string(),
            label: "Color".to_string(),
            is_taxonomy: true,
            options: Json(vec!["ignored".to_string()]),
        }
        .into();
        assert_eq!(attribute.kind, AttributeKind::Enumerated);
    }

    #[test]
    fn test_inline_row_keeps_options() {
        let attribute: Attribute = AttributeRow {
            product_id: ProductId::new(4),
            name: "size".to_string(),
            label: "Size".to_string(),
            is_taxonomy: false,
            options: Json(vec!["S".to_string(), "M".to_string()]),
        }
        .into();
        assert_eq!(
            attribute.kind,
            AttributeKind::Freeform {
                options: vec!["S".to_string(), "M".to_string()]
            }
        );
    }

    #[test]
    fn test_product_from_row() {
        let product =
            product_from_row(product_row("variable"), Vec::new(), vec![VariationId::new(9)])
                .unwrap();
        assert!(product.is_eligible());
    }

    #[test]
    fn test_unknown_product_type_is_corruption() {
        let err = product_from_row(product_row("bundle"), Vec::new(), Vec::new()).unwrap_err();
        assert!(matches!(err, RepositoryError::DataCorruption(msg) if msg.contains("bundle")));
    }
}
