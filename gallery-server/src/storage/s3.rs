//! S3-compatible object storage

use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;

use super::{ObjectStorage, StorageError, key_for_uri, public_url};
use crate::config::Config;

#[derive(Clone)]
pub struct S3Storage {
    client: S3Client,
    bucket: String,
    public_base_url: String,
    /// For URIs recorded under a different base URL
    http: reqwest::Client,
}

impl S3Storage {
    pub fn new(client: S3Client, bucket: impl Into<String>, public_base_url: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            public_base_url: public_base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Build a client from the ambient AWS credential chain plus the
    /// configured region and optional custom endpoint.
    pub async fn from_config(config: &Config) -> Self {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.s3_region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &config.s3_endpoint {
            tracing::info!(endpoint = %endpoint, "Using custom S3 endpoint (path-style)");
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self::new(
            S3Client::from_conf(builder.build()),
            config.s3_bucket.clone(),
            config.public_base_url(),
        )
    }

    async fn fetch_object(&self, uri: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        let fetch_err = |message: String| StorageError::Fetch {
            uri: uri.to_string(),
            message,
        };

        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| fetch_err(DisplayErrorContext(&e).to_string()))?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| fetch_err(e.to_string()))?;
        Ok(body.into_bytes().to_vec())
    }

    async fn fetch_url(&self, uri: &str) -> Result<Vec<u8>, StorageError> {
        let fetch_err = |e: reqwest::Error| StorageError::Fetch {
            uri: uri.to_string(),
            message: e.to_string(),
        };

        let bytes = self
            .http
            .get(uri)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(fetch_err)?
            .bytes()
            .await
            .map_err(fetch_err)?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Upload {
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(public_url(&self.public_base_url, key))
    }

    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, StorageError> {
        match key_for_uri(&self.public_base_url, uri) {
            Some(key) => self.fetch_object(uri, key).await,
            None => self.fetch_url(uri).await,
        }
    }
}
