//! S3 (or S3-compatible) blob store.

use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use crate::{public_url, BlobStore, StorageError};

#[derive(Debug, Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
    public_url: String,
}

impl S3BlobStore {
    pub fn new(client: Client, bucket: impl Into<String>, public_url: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            public_url: public_url.into(),
        }
    }

    /// Build a client from the standard AWS environment (credentials chain,
    /// `AWS_REGION`, `AWS_ENDPOINT_URL`).
    pub async fn from_env(
        bucket: impl Into<String>,
        public_url: Option<String>,
    ) -> Result<Self, StorageError> {
        let bucket = bucket.into();
        if bucket.trim().is_empty() {
            return Err(StorageError::Config("S3 bucket name is empty".into()));
        }
        let config = aws_config::load_from_env().await;
        let public_url =
            public_url.unwrap_or_else(|| format!("https://{bucket}.s3.amazonaws.com"));
        Ok(Self::new(Client::new(&config), bucket, public_url))
    }

    fn s3_error(&self, key: &str, message: String) -> StorageError {
        StorageError::S3 {
            bucket: self.bucket.clone(),
            key: key.to_string(),
            message,
        }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn download(&self, path: &str, dest: &Path) -> Result<(), StorageError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    StorageError::NotFound(path.to_string())
                } else {
                    self.s3_error(path, DisplayErrorContext(&e).to_string())
                }
            })?;

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| self.s3_error(path, e.to_string()))?
            .into_bytes();

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::io(parent, e))?;
        }
        tokio::fs::write(dest, &bytes)
            .await
            .map_err(|e| StorageError::io(dest, e))?;

        tracing::debug!(bucket = %self.bucket, path, bytes = bytes.len(), "Downloaded object");
        Ok(())
    }

    async fn upload(&self, local: &Path, path: &str) -> Result<String, StorageError> {
        let body = ByteStream::from_path(local)
            .await
            .map_err(|e| self.s3_error(path, e.to_string()))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .content_type("image/png")
            .body(body)
            .send()
            .await
            .map_err(|e| self.s3_error(path, DisplayErrorContext(&e).to_string()))?;

        tracing::debug!(bucket = %self.bucket, path, "Uploaded object");
        Ok(public_url(&self.public_url, path))
    }
}
