//! In-process object storage for tests

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ObjectStorage, StorageError, key_for_uri, public_url};

pub const MEMORY_BASE_URL: &str = "memory://gallery";

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

#[derive(Default)]
pub struct MemoryStorage {
    objects: RwLock<HashMap<String, StoredObject>>,
    /// Reject every `put`, to exercise upload failure paths
    fail_puts: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_puts: true,
            ..Self::default()
        }
    }

    pub async fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn put(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        if self.fail_puts {
            return Err(StorageError::Upload {
                key: key.to_string(),
                message: "storage unavailable".into(),
            });
        }
        self.objects.write().await.insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(public_url(MEMORY_BASE_URL, key))
    }

    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, StorageError> {
        let not_found = || StorageError::Fetch {
            uri: uri.to_string(),
            message: "no such object".into(),
        };
        let key = key_for_uri(MEMORY_BASE_URL, uri).ok_or_else(not_found)?;
        self.get(key).await.map(|o| o.body).ok_or_else(not_found)
    }
}
