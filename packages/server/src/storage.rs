use async_trait::async_trait;
use s3::{Bucket, BucketConfiguration, Region, creds::Credentials};

use crate::config::StorageConfig;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("bucket setup failed: {0}")]
    Bucket(String),
    #[error("storage request failed: {0}")]
    Request(#[from] s3::error::S3Error),
    #[error("storage returned unexpected status {0}")]
    UnexpectedStatus(u16),
    #[error("no public base URL configured")]
    PublicUrlUnavailable,
}

/// Object store for generated images.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Make sure the target bucket exists, creating it if needed.
    async fn ensure_bucket(&self) -> Result<(), StorageError>;

    /// Write an object under `key`.
    async fn put_object(
        &self,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// Durable public URL for an object under `key`.
    fn public_url(&self, key: &str) -> Result<String, StorageError>;
}

/// S3-compatible store (MinIO in development).
pub struct S3AssetStore {
    bucket: Box<Bucket>,
    credentials: Credentials,
    public_base_url: Option<String>,
}

impl S3AssetStore {
    pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Bucket(e.to_string()))?;

        let bucket =
            Bucket::new(&config.bucket, region, credentials.clone())?.with_path_style();

        Ok(Self {
            bucket,
            credentials,
            public_base_url: config
                .public_base_url
                .as_ref()
                .map(|url| url.trim_end_matches('/').to_owned()),
        })
    }
}

#[async_trait]
impl AssetStore for S3AssetStore {
    async fn ensure_bucket(&self) -> Result<(), StorageError> {
        if self.bucket.exists().await? {
            return Ok(());
        }

        let response = Bucket::create_with_path_style(
            &self.bucket.name(),
            self.bucket.region(),
            self.credentials.clone(),
            BucketConfiguration::public(),
        )
        .await?;

        if !response.success() {
            return Err(StorageError::Bucket(response.response_text));
        }
        Ok(())
    }

    async fn put_object(
        &self,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError> {
        let response = self
            .bucket
            .put_object_with_content_type(key, bytes, content_type)
            .await?;

        match response.status_code() {
            200 => Ok(()),
            other => Err(StorageError::UnexpectedStatus(other)),
        }
    }

    fn public_url(&self, key: &str) -> Result<String, StorageError> {
        let base = self
            .public_base_url
            .as_deref()
            .ok_or(StorageError::PublicUrlUnavailable)?;
        Ok(format!("{}/{}/{}", base, self.bucket.name(), key))
    }
}
