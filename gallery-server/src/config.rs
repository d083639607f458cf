//! Gallery server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Default maximum upload size (20MB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Gallery server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    /// HTTP listen port
    pub http_port: u16,
    /// PostgreSQL connection URL. Absent only in development, where the
    /// in-memory repository is used instead.
    pub database_url: Option<String>,
    /// S3 bucket holding image bytes
    pub s3_bucket: String,
    pub s3_region: String,
    /// Custom endpoint for S3-compatible stores (MinIO, R2, ...)
    pub s3_endpoint: Option<String>,
    /// Public base URL objects are served from
    pub s3_public_url: Option<String>,
    /// Shared upload credentials
    pub upload_username: Option<String>,
    pub upload_password: Option<String>,
    pub max_upload_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BoxError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let environment = var("ENVIRONMENT").unwrap_or_else(|| "development".into());

        let database_url = var("DATABASE_URL");
        if database_url.is_none() && environment != "development" {
            return Err(format!("DATABASE_URL must be set in {environment} environment").into());
        }

        let max_upload_bytes = match var("MAX_UPLOAD_BYTES") {
            Some(raw) => raw
                .parse()
                .map_err(|_| format!("MAX_UPLOAD_BYTES is not a number: {raw}"))?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            http_port: var("HTTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_url,
            s3_bucket: var("S3_BUCKET").unwrap_or_else(|| "gallery-images".into()),
            s3_region: var("S3_REGION").unwrap_or_else(|| "us-east-1".into()),
            s3_endpoint: var("S3_ENDPOINT"),
            s3_public_url: var("S3_PUBLIC_URL"),
            upload_username: var("USERNAME"),
            upload_password: var("PASSWORD"),
            max_upload_bytes,
            environment,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Base URL that object keys are appended to when building public URLs
    ///
    /// `S3_PUBLIC_URL` wins; a custom endpoint without one gives the
    /// path-style `{endpoint}/{bucket}`; otherwise the AWS virtual-hosted form.
    pub fn public_base_url(&self) -> String {
        match (&self.s3_public_url, &self.s3_endpoint) {
            (Some(url), _) => url.trim_end_matches('/').to_string(),
            (None, Some(endpoint)) => {
                format!("{}/{}", endpoint.trim_end_matches('/'), self.s3_bucket)
            }
            (None, None) => format!(
                "https://{}.s3.{}.amazonaws.com",
                self.s3_bucket, self.s3_region
            ),
        }
    }
}
