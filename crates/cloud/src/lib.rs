//! Blob storage for layer artwork and rendered composites.
//!
//! The generator only needs two operations: pull a layer file down to the
//! scratch directory, and push a finished composite up under a key,
//! receiving the public URL it will be served from.

pub mod local;
pub mod s3;

use std::path::Path;

use async_trait::async_trait;
use nftgen_core::error::CoreError;

pub use local::LocalBlobStore;
pub use s3::S3BlobStore;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("S3 error on s3://{bucket}/{key}: {message}")]
    S3 {
        bucket: String,
        key: String,
        message: String,
    },

    #[error("Storage configuration error: {0}")]
    Config(String),
}

impl StorageError {
    pub(crate) fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// Backend selection
// ---------------------------------------------------------------------------

/// Configured blob store provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackendType {
    Local,
    S3,
}

impl StorageBackendType {
    /// Parse from the `STORAGE_BACKEND` setting.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "local" => Ok(Self::Local),
            "s3" => Ok(Self::S3),
            other => Err(CoreError::Validation(format!(
                "Unknown storage backend type '{other}'. Must be one of: local, s3"
            ))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::S3 => "s3",
        }
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Copy the object at `path` to the local file `dest`, creating parent
    /// directories as needed.
    async fn download(&self, path: &str, dest: &Path) -> Result<(), StorageError>;

    /// Store the local file `local` under `path` and return its public URL.
    async fn upload(&self, local: &Path, path: &str) -> Result<String, StorageError>;
}

/// Join a public base URL and an object key with exactly one slash.
pub fn public_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_type_names() {
        assert_eq!(StorageBackendType::from_name("s3").unwrap(), StorageBackendType::S3);
        assert_eq!(StorageBackendType::Local.name(), "local");
        assert!(StorageBackendType::from_name("nfs").is_err());
    }

    #[test]
    fn public_url_single_slash() {
        assert_eq!(
            public_url("https://cdn.test/", "/composites/1.png"),
            "https://cdn.test/composites/1.png"
        );
        assert_eq!(public_url("http://x", "a/b.png"), "http://x/a/b.png");
    }
}
