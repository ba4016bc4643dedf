//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! vt-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `VT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Catalog migrations live in `crates/admin/migrations/` and are embedded at
//! compile time.

use thiserror::Error;

use variation_table_admin::db;

use super::database_url;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run catalog database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database URL is missing, the connection
/// fails or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let database_url = database_url().ok_or(MigrationError::MissingEnvVar("VT_DATABASE_URL"))?;

    tracing::info!("Connecting to catalog database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Running catalog migrations...");
    sqlx::migrate!("../admin/migrations").run(&pool).await?;

    tracing::info!("Catalog migrations complete!");
    Ok(())
}
