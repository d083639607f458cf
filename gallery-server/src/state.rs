//! Application state for gallery-server

use std::sync::Arc;

use crate::auth::UploadCredentials;
use crate::config::{Config, DEFAULT_MAX_UPLOAD_BYTES};
use crate::db::{ImageRepository, MemoryImageRepository, PgImageRepository};
use crate::storage::{ObjectStorage, S3Storage};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Image metadata store
    pub images: Arc<dyn ImageRepository>,
    /// Image bytes
    pub storage: Arc<dyn ObjectStorage>,
    /// Shared upload credentials
    pub credentials: UploadCredentials,
    pub max_upload_bytes: usize,
    /// Mounts development-only routes (seed)
    pub development: bool,
}

impl AppState {
    /// Create a new AppState from configuration
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let images: Arc<dyn ImageRepository> = match &config.database_url {
            Some(url) => {
                let repo = PgImageRepository::connect(url).await?;
                tracing::info!("Connected to PostgreSQL, migrations applied");
                Arc::new(repo)
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory image store");
                Arc::new(MemoryImageRepository::new())
            }
        };

        let storage = S3Storage::from_config(config).await;
        tracing::info!(bucket = %config.s3_bucket, "S3 storage ready");

        let credentials = UploadCredentials::from_config(config);
        if !credentials.is_configured() {
            tracing::warn!("USERNAME / PASSWORD not set, uploads will be rejected");
        }

        Ok(Self {
            images,
            storage: Arc::new(storage),
            credentials,
            max_upload_bytes: config.max_upload_bytes,
            development: config.is_development(),
        })
    }

    /// Assemble state from explicit backends
    pub fn from_parts(
        images: Arc<dyn ImageRepository>,
        storage: Arc<dyn ObjectStorage>,
        credentials: UploadCredentials,
    ) -> Self {
        Self {
            images,
            storage,
            credentials,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            development: false,
        }
    }

    pub fn with_max_upload_bytes(mut self, max: usize) -> Self {
        self.max_upload_bytes = max;
        self
    }

    pub fn with_development(mut self, development: bool) -> Self {
        self.development = development;
        self
    }
}
