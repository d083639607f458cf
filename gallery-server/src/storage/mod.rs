//! Object storage for image bytes
//!
//! The metadata store only keeps the public URL returned by [`ObjectStorage::put`].

pub mod memory;
pub mod s3;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryStorage;
pub use s3::S3Storage;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload of {key} failed: {message}")]
    Upload { key: String, message: String },

    #[error("Fetch of {uri} failed: {message}")]
    Fetch { uri: String, message: String },
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `body` under `key` and return its public URL
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str)
    -> Result<String, StorageError>;

    /// Read back the bytes behind a public URL
    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, StorageError>;
}

/// Object key for a new upload: `images/{uuid}.{ext}`
pub fn image_key(extension: &str) -> String {
    format!("images/{}.{extension}", uuid::Uuid::new_v4())
}

/// `base` + `/` + `key`, tolerating a trailing slash on `base`
pub fn public_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key)
}

/// Reverse of [`public_url`]: the key when `uri` lives under `base`
pub fn key_for_uri<'a>(base: &str, uri: &'a str) -> Option<&'a str> {
    let rest = uri.strip_prefix(base.trim_end_matches('/'))?;
    let key = rest.strip_prefix('/')?;
    let key = key.split(['?', '#']).next().unwrap_or_default();
    (!key.is_empty()).then_some(key)
}
