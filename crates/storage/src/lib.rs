//! Object storage for uploaded files.
//!
//! The file module talks to [`ObjectStorage`] only. [`S3Storage`] backs it
//! in every deployed environment (AWS or any S3-compatible endpoint);
//! [`InMemoryStorage`] backs tests.

mod memory;
mod s3;

use async_trait::async_trait;

pub use memory::InMemoryStorage;
pub use s3::{S3Config, S3Storage};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// An object read back from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Put/get/delete by key against a single bucket.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Short backend name for logs.
    fn backend(&self) -> &'static str;

    async fn put(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> Result<(), StorageError>;

    async fn get(&self, key: &str) -> Result<StoredObject, StorageError>;

    /// Remove `key`. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Storage key for an uploaded file: `files/{id}/{safe name}`.
///
/// The id keeps keys unique; the name is reduced to a conservative
/// character set so it is safe in any S3-compatible backend.
pub fn object_key(file_id: uuid::Uuid, original_name: &str) -> String {
    let safe: String = original_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let safe = safe.trim_matches('.');
    let safe = if safe.is_empty() { "file" } else { safe };
    format!("files/{file_id}/{safe}")
}
