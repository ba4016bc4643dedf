//! Media repository for image attachments.

use std::collections::HashMap;

use sqlx::PgPool;

use variation_table_core::ImageId;

use super::{RepositoryError, id_array};

#[derive(Debug, sqlx::FromRow)]
struct ThumbnailRow {
    id: ImageId,
    thumbnail_path: String,
}

/// Repository for media lookups.
pub struct MediaRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MediaRepository<'a> {
    /// Create a new media repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Thumbnail paths for the given images, as stored.
    ///
    /// Unknown IDs are absent from the result.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn thumbnails(
        &self,
        ids: &[ImageId],
    ) -> Result<HashMap<ImageId, String>, RepositoryError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, ThumbnailRow>(
            r"
            SELECT id, thumbnail_path
            FROM catalog.media
            WHERE id = ANY($1)
            ",
        )
        .bind(id_array(ids))
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.id, row.thumbnail_path))
            .collect())
    }
}
