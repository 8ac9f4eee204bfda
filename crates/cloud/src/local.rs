//! Filesystem-backed blob store, for development and tests.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::{public_url, BlobStore, StorageError};

#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    base_path: PathBuf,
    public_url: String,
}

impl LocalBlobStore {
    pub fn new(base_path: impl Into<PathBuf>, public_url: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            public_url: public_url.into(),
        }
    }

    /// On-disk location of an object key.
    pub fn object_path(&self, path: &str) -> PathBuf {
        self.base_path.join(path.trim_start_matches('/'))
    }
}

async fn ensure_parent(path: &Path) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| StorageError::io(parent, e))?;
    }
    Ok(())
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn download(&self, path: &str, dest: &Path) -> Result<(), StorageError> {
        let source = self.object_path(path);
        if !tokio::fs::try_exists(&source)
            .await
            .map_err(|e| StorageError::io(&source, e))?
        {
            return Err(StorageError::NotFound(path.to_string()));
        }
        ensure_parent(dest).await?;
        tokio::fs::copy(&source, dest)
            .await
            .map_err(|e| StorageError::io(&source, e))?;
        tracing::debug!(path, dest = %dest.display(), "Copied object from local store");
        Ok(())
    }

    async fn upload(&self, local: &Path, path: &str) -> Result<String, StorageError> {
        let target = self.object_path(path);
        ensure_parent(&target).await?;
        tokio::fs::copy(local, &target)
            .await
            .map_err(|e| StorageError::io(local, e))?;
        tracing::debug!(path, "Stored object in local store");
        Ok(public_url(&self.public_url, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_then_download() {
        let root = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(root.path().join("store"), "http://localhost/storage/");

        let src = root.path().join("src.bin");
        tokio::fs::write(&src, b"layer").await.unwrap();

        let url = store.upload(&src, "composites/1/2/3/0.png").await.unwrap();
        assert_eq!(url, "http://localhost/storage/composites/1/2/3/0.png");
        assert!(store.object_path("composites/1/2/3/0.png").exists());

        let dest = root.path().join("scratch/layers/0.png");
        store.download("composites/1/2/3/0.png", &dest).await.unwrap();
        assert_eq!(tokio::fs::read(&dest).await.unwrap(), b"layer");
    }

    #[tokio::test]
    async fn missing_object_is_not_found() {
        let root = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(root.path(), "http://x");
        let err = store
            .download("layers/nope.png", &root.path().join("out.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound(p) if p == "layers/nope.png"));
    }
}
