//! Database operations for the catalog `PostgreSQL` database.
//!
//! ## Tables (schema `catalog`)
//!
//! - `product` - Products with their type tag
//! - `product_attribute` - Attribute definitions per product (inline options as JSONB)
//! - `attribute_term` - Term lists of taxonomy-backed attributes
//! - `variation` - Child variations (SKU, regular price, image)
//! - `variation_attribute` - Attribute values assigned to each variation
//! - `media` - Image attachments and their thumbnail paths
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p variation-table-cli -- migrate
//! ```

pub mod catalog;
pub mod media;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use variation_table_core::catalog::CatalogError;

pub use catalog::{CatalogRepository, PgCatalogStore};
pub use media::MediaRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate SKU).
    #[error("{0}")]
    Conflict(String),

    /// The write was refused (e.g., unknown image).
    #[error("{0}")]
    Rejected(String),
}

impl From<RepositoryError> for CatalogError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            RepositoryError::Rejected(msg) => Self::Validation(msg),
            other @ (RepositoryError::Database(_) | RepositoryError::DataCorruption(_)) => {
                Self::Backend(other.to_string())
            }
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Convert IDs for `= ANY($1)` binds.
pub(crate) fn id_array<T: Copy + Into<i64>>(ids: &[T]) -> Vec<i64> {
    ids.iter().map(|&id| id.into()).collect()
}
