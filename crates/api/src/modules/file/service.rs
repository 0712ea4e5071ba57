use std::sync::Arc;

use bcpms_core::error::CoreError;
use bcpms_core::sanitize::sanitize;
use bcpms_core::types::{new_id, DbId};
use bcpms_db::models::file::{CreateFileRecord, FileRecord};
use bcpms_db::repositories::{FileRepo, ProjectRepo};
use bcpms_db::Database;
use bcpms_storage::{object_key, ObjectStorage, StorageError};

use crate::error::{AppError, AppResult};

/// Fallback content type when the client sends none.
const OCTET_STREAM: &str = "application/octet-stream";

/// A decoded multipart upload.
#[derive(Debug)]
pub struct Upload {
    pub original_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    pub project_id: Option<DbId>,
}

#[derive(Clone)]
pub struct FileService {
    db: Database,
    storage: Arc<dyn ObjectStorage>,
}

impl FileService {
    pub fn new(db: Database, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { db, storage }
    }

    pub async fn list(&self, project_id: Option<DbId>) -> AppResult<Vec<FileRecord>> {
        Ok(FileRepo::list(self.db.pool(), project_id).await?)
    }

    /// Store the payload, then record it. A failed insert removes the
    /// object again.
    pub async fn upload(&self, upload: Upload) -> AppResult<FileRecord> {
        if let Some(project_id) = upload.project_id {
            ProjectRepo::find_by_id(self.db.pool(), project_id)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "Project",
                    id: project_id,
                })?;
        }

        let id = new_id();
        let original_name = display_name(&upload.original_name);
        let storage_key = object_key(id, &original_name);
        let content_type = upload
            .content_type
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| OCTET_STREAM.to_string());
        let size_bytes = i64::try_from(upload.bytes.len())
            .map_err(|_| AppError::BadRequest("Upload is too large".to_string()))?;

        self.storage
            .put(&storage_key, &content_type, upload.bytes)
            .await?;

        let input = CreateFileRecord {
            id,
            project_id: upload.project_id,
            original_name,
            content_type,
            size_bytes,
            storage_key,
        };
        match FileRepo::create(self.db.pool(), &input).await {
            Ok(record) => {
                tracing::info!(
                    file_id = %record.id,
                    size_bytes = record.size_bytes,
                    backend = self.storage.backend(),
                    "File uploaded",
                );
                Ok(record)
            }
            Err(e) => {
                if let Err(cleanup) = self.storage.delete(&input.storage_key).await {
                    tracing::warn!(key = %input.storage_key, error = %cleanup, "Failed to remove orphaned object");
                }
                Err(e.into())
            }
        }
    }

    pub async fn get(&self, id: DbId) -> AppResult<FileRecord> {
        FileRepo::find_by_id(self.db.pool(), id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Metadata plus payload.
    pub async fn download(&self, id: DbId) -> AppResult<(FileRecord, Vec<u8>)> {
        let record = self.get(id).await?;
        let object = self.storage.get(&record.storage_key).await?;
        Ok((record, object.bytes))
    }

    /// Delete the stored object, then the row. An object that is already
    /// gone does not block removing the row.
    pub async fn delete(&self, id: DbId) -> AppResult<()> {
        let record = self.get(id).await?;
        match self.storage.delete(&record.storage_key).await {
            Ok(()) => {}
            Err(StorageError::NotFound(key)) => {
                tracing::warn!(file_id = %id, key = %key, "Stored object already missing");
            }
            Err(e) => return Err(e.into()),
        }
        if !FileRepo::delete(self.db.pool(), id).await? {
            return Err(not_found(id));
        }
        tracing::info!(file_id = %id, "File deleted");
        Ok(())
    }
}

/// Client-supplied filename with markup and control characters removed.
fn display_name(raw: &str) -> String {
    let clean = sanitize(raw);
    let base = clean.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or_default().trim();
    if base.is_empty() {
        "upload".to_string()
    } else {
        base.to_string()
    }
}

/// `Content-Disposition` value for downloading `name`.
///
/// The plain `filename` keeps printable ASCII only; `filename*` carries the
/// full UTF-8 name percent-encoded.
pub fn content_disposition(name: &str) -> String {
    let ascii: String = name
        .chars()
        .map(|c| {
            if c == ' ' || (c.is_ascii_graphic() && c != '"' && c != '\\') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{ascii}\"; filename*=UTF-8''{}",
        urlencoding::encode(name)
    )
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "File", id })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_strips_paths_and_markup() {
        assert_eq!(display_name("C:\\Users\\me\\plan.pdf"), "plan.pdf");
        assert_eq!(display_name("../../etc/passwd"), "passwd");
        assert_eq!(display_name("<b>brief</b>.docx"), "brief.docx");
        assert_eq!(display_name("<script>x</script>"), "upload");
    }

    #[test]
    fn disposition_escapes_quotes_and_encodes_unicode() {
        assert_eq!(
            content_disposition("a\"b.txt"),
            "attachment; filename=\"a_b.txt\"; filename*=UTF-8''a%22b.txt"
        );
        let value = content_disposition("résumé.pdf");
        assert!(value.contains("filename=\"r_sum_.pdf\""), "got {value}");
        assert!(value.contains("filename*=UTF-8''r%C3%A9sum%C3%A9.pdf"), "got {value}");
    }
}
