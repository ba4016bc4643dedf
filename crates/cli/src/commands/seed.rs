//! Seed the catalog database with demo products.
//!
//! Reads a YAML catalog description and inserts its products, attribute
//! terms, media and variations in one transaction. Running it twice inserts
//! a second copy; SKUs must stay unique, so the second run fails and rolls
//! back.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use sqlx::types::Json;
use thiserror::Error;
use tracing::info;

use variation_table_admin::db;
use variation_table_core::{AttributeKind, ImageId, ProductId, ProductType};

use super::database_url;

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid catalog: {0}")]
    Invalid(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

// =============================================================================
// Catalog File
// =============================================================================

/// Top-level catalog file.
#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    /// Term lists of taxonomy-backed attributes.
    #[serde(default)]
    pub terms: BTreeMap<String, Vec<String>>,
    pub products: Vec<ProductEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ProductEntry {
    pub name: String,
    #[serde(rename = "type", default = "variable")]
    pub product_type: ProductType,
    #[serde(default)]
    pub attributes: Vec<AttributeEntry>,
    #[serde(default)]
    pub variations: Vec<VariationEntry>,
}

const fn variable() -> ProductType {
    ProductType::Variable
}

#[derive(Debug, Deserialize)]
pub struct AttributeEntry {
    pub name: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: AttributeKind,
}

#[derive(Debug, Deserialize)]
pub struct VariationEntry {
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub regular_price: String,
    /// Thumbnail path or URL; a media row is created for it.
    pub image: Option<String>,
}

impl CatalogFile {
    /// Parse a catalog file from YAML.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Yaml` for malformed YAML.
    pub fn from_yaml(content: &str) -> Result<Self, SeedError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Check the catalog for mistakes the database would reject less clearly.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut skus = HashSet::new();

        for product in &self.products {
            let declared: HashSet<&str> =
                product.attributes.iter().map(|a| a.name.as_str()).collect();

            if product.product_type != ProductType::Variable && !product.variations.is_empty() {
                errors.push(format!(
                    "{}: only variable products can have variations",
                    product.name
                ));
            }

            for attribute in &product.attributes {
                if matches!(attribute.kind, AttributeKind::Enumerated)
                    && !self.terms.contains_key(&attribute.name)
                {
                    errors.push(format!(
                        "{}: no terms listed for attribute {}",
                        product.name, attribute.name
                    ));
                }
            }

            for variation in &product.variations {
                for name in variation.attributes.keys() {
                    if !declared.contains(name.as_str()) {
                        errors.push(format!(
                            "{}: variation uses undeclared attribute {name}",
                            product.name
                        ));
                    }
                }
                if !variation.sku.is_empty() && !skus.insert(variation.sku.as_str()) {
                    errors.push(format!("duplicate SKU {}", variation.sku));
                }
                if let Err(e) = variation_table_core::parse_regular_price(&variation.regular_price)
                {
                    errors.push(format!("{} ({}): {e}", product.name, variation.sku));
                }
            }
        }
        errors
    }
}

// =============================================================================
// Command
// =============================================================================

/// Seed the demo catalog from a YAML file.
///
/// # Errors
///
/// Returns `SeedError` if the file cannot be read or validated, or if any
/// insert fails (in which case nothing is committed).
pub async fn demo(file_path: &str) -> Result<(), SeedError> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(SeedError::FileNotFound(file_path.to_string()));
    }

    info!(path = %file_path, "Loading catalog from file");
    let content = tokio::fs::read_to_string(path).await?;
    let catalog = CatalogFile::from_yaml(&content)?;

    let errors = catalog.validate();
    if !errors.is_empty() {
        for err in &errors {
            tracing::error!("  - {err}");
        }
        return Err(SeedError::Invalid(format!(
            "{} validation errors found",
            errors.len()
        )));
    }

    let database_url = database_url().ok_or(SeedError::MissingEnvVar("VT_DATABASE_URL"))?;
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let mut tx = pool.begin().await?;

    for (attribute_name, terms) in &catalog.terms {
        for (position, term) in (0_i32..).zip(terms) {
            sqlx::query(
                r"
                INSERT INTO catalog.attribute_term (attribute_name, name, position)
                VALUES ($1, $2, $3)
                ON CONFLICT (attribute_name, name) DO UPDATE SET position = EXCLUDED.position
                ",
            )
            .bind(attribute_name)
            .bind(term)
            .bind(position)
            .execute(&mut *tx)
            .await?;
        }
    }

    let mut media: HashMap<&str, ImageId> = HashMap::new();
    let mut variation_count = 0_usize;

    for product in &catalog.products {
        let product_id: ProductId = sqlx::query_scalar(
            r"
            INSERT INTO catalog.product (name, product_type)
            VALUES ($1, $2)
            RETURNING id
            ",
        )
        .bind(&product.name)
        .bind(product.product_type.as_str())
        .fetch_one(&mut *tx)
        .await?;

        for (position, attribute) in (0_i32..).zip(&product.attributes) {
            let options = match &attribute.kind {
                AttributeKind::Enumerated => Vec::new(),
                AttributeKind::Freeform { options } => options.clone(),
            };
            sqlx::query(
                r"
                INSERT INTO catalog.product_attribute
                    (product_id, position, name, label, is_taxonomy, options)
                VALUES ($1, $2, $3, $4, $5, $6)
                ",
            )
            .bind(product_id)
            .bind(position)
            .bind(&attribute.name)
            .bind(&attribute.label)
            .bind(matches!(attribute.kind, AttributeKind::Enumerated))
            .bind(Json(options))
            .execute(&mut *tx)
            .await?;
        }

        for (position, variation) in (0_i32..).zip(&product.variations) {
            let image_id = match variation.image.as_deref() {
                Some(path) => {
                    if let Some(id) = media.get(path) {
                        Some(*id)
                    } else {
                        let id: ImageId = sqlx::query_scalar(
                            "INSERT INTO catalog.media (thumbnail_path) VALUES ($1) RETURNING id",
                        )
                        .bind(path)
                        .fetch_one(&mut *tx)
                        .await?;
                        media.insert(path, id);
                        Some(id)
                    }
                }
                None => None,
            };

            let variation_id: i64 = sqlx::query_scalar(
                r"
                INSERT INTO catalog.variation
                    (product_id, position, sku, regular_price, image_id)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id
                ",
            )
            .bind(product_id)
            .bind(position)
            .bind(&variation.sku)
            .bind(&variation.regular_price)
            .bind(image_id)
            .fetch_one(&mut *tx)
            .await?;

            for (name, value) in &variation.attributes {
                sqlx::query(
                    r"
                    INSERT INTO catalog.variation_attribute (variation_id, attribute_name, value)
                    VALUES ($1, $2, $3)
                    ",
                )
                .bind(variation_id)
                .bind(name)
                .bind(value)
                .execute(&mut *tx)
                .await?;
            }
            variation_count += 1;
        }

        info!(product_id = %product_id, name = %product.name, "Seeded product");
    }

    tx.commit().await?;

    info!(
        products = catalog.products.len(),
        variations = variation_count,
        media = media.len(),
        "Demo catalog seeded"
    );
    Ok(())
}
