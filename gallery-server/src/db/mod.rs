//! Image metadata store
//!
//! [`ImageRepository`] is the seam between handlers and the store:
//! [`postgres::PgImageRepository`] in production, [`memory::MemoryImageRepository`]
//! for development without a database and for tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use shared::ListQuery;
use shared::models::{Image, ImageCreate};
use thiserror::Error;

pub use memory::MemoryImageRepository;
pub use postgres::PgImageRepository;

/// Tags stamped onto every record by the development seed route
pub const SEED_TAGS: &[&str] = &["#test"];
/// AI model stamped onto every record by the development seed route
pub const SEED_AI_MODEL: &str = "#dummy";

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Every read filters out soft-deleted records.
#[async_trait]
pub trait ImageRepository: Send + Sync {
    /// One sorted page of records
    async fn list(&self, query: &ListQuery) -> RepoResult<Vec<Image>>;

    /// Number of records
    async fn count(&self) -> RepoResult<i64>;

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Image>>;

    /// Insert a record with a fresh id, `created_at = now`, zero likes
    async fn create(&self, data: ImageCreate) -> RepoResult<Image>;

    /// Add one like atomically; `None` when the record does not exist
    async fn increment_likes(&self, id: &str) -> RepoResult<Option<i64>>;

    /// Overwrite tags and AI model with [`SEED_TAGS`] / [`SEED_AI_MODEL`];
    /// returns how many records changed
    async fn seed_test_metadata(&self) -> RepoResult<u64>;
}
