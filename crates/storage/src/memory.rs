use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{ObjectStorage, StorageError, StoredObject};

/// Process-local storage used by tests and local runs without a bucket.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectStorage for InMemoryStorage {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn put(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> Result<(), StorageError> {
        self.objects.write().await.insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type: Some(content_type.to_string()),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<StoredObject, StorageError> {
        self.objects
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.objects.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[tokio::test]
    async fn put_get_delete() {
        let storage = InMemoryStorage::new();
        storage.put("files/a/report.pdf", "application/pdf", b"%PDF".to_vec()).await.unwrap();

        let object = storage.get("files/a/report.pdf").await.unwrap();
        assert_eq!(object.bytes, b"%PDF");
        assert_eq!(object.content_type.as_deref(), Some("application/pdf"));

        storage.delete("files/a/report.pdf").await.unwrap();
        assert!(storage.is_empty().await);
        assert_matches!(storage.get("files/a/report.pdf").await, Err(StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn deleting_missing_key_is_ok() {
        let storage = InMemoryStorage::new();
        assert!(storage.delete("nope").await.is_ok());
    }
}
