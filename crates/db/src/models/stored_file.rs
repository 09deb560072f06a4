//! Stored file (blob) entity models.

use buildup_core::types::{EntityId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A full row from the `stored_files` table, including the bytes.
#[derive(Debug, Clone, FromRow)]
pub struct StoredFile {
    pub id: EntityId,
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
    pub uploaded_at: Timestamp,
}

/// File metadata without the bytes, for listings and upload responses.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StoredFileInfo {
    pub id: EntityId,
    pub file_name: String,
    pub content_type: String,
    pub uploaded_at: Timestamp,
}
