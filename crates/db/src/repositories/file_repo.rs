//! Repository for the `stored_files` table (blob storage).

use buildup_core::types::new_entity_id;
use sqlx::PgPool;

use crate::models::stored_file::{StoredFile, StoredFileInfo};

/// Column list including the bytes.
const COLUMNS: &str = "id, file_name, content_type, data, uploaded_at";

/// Metadata-only column list.
const INFO_COLUMNS: &str = "id, file_name, content_type, uploaded_at";

/// Provides blob storage over Postgres.
pub struct FileRepo;

impl FileRepo {
    /// Store a file under a name, atomically replacing any previous
    /// content stored under the same name. The existing row keeps its
    /// id on replace.
    ///
    /// Returns the stored file's metadata.
    pub async fn upsert(
        pool: &PgPool,
        file_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<StoredFileInfo, sqlx::Error> {
        let query = format!(
            "INSERT INTO stored_files (id, file_name, content_type, data, uploaded_at)
             VALUES ($1, $2, $3, $4, NOW())
             ON CONFLICT (file_name) DO UPDATE
                 SET content_type = EXCLUDED.content_type,
                     data = EXCLUDED.data,
                     uploaded_at = NOW()
             RETURNING {INFO_COLUMNS}"
        );
        sqlx::query_as::<_, StoredFileInfo>(&query)
            .bind(new_entity_id())
            .bind(file_name)
            .bind(content_type)
            .bind(data)
            .fetch_one(pool)
            .await
    }

    /// Fetch a file with its bytes by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<StoredFile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stored_files WHERE id = $1");
        sqlx::query_as::<_, StoredFile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch a file with its bytes by stored name.
    pub async fn find_by_name(
        pool: &PgPool,
        file_name: &str,
    ) -> Result<Option<StoredFile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stored_files WHERE file_name = $1");
        sqlx::query_as::<_, StoredFile>(&query)
            .bind(file_name)
            .fetch_optional(pool)
            .await
    }
}
