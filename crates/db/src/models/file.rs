//! Stored file metadata. The payload itself lives in object storage.

use bcpms_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `files` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: DbId,
    pub project_id: Option<DbId>,
    pub original_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    #[serde(skip_serializing)]
    pub storage_key: String,
    pub created_at: Timestamp,
}

/// Insert input, assembled by the file service after the upload is stored.
#[derive(Debug, Clone)]
pub struct CreateFileRecord {
    pub id: DbId,
    pub project_id: Option<DbId>,
    pub original_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub storage_key: String,
}
