//! Scratch directory for one generation run.
//!
//! Layout: `<scratch_root>/<project>/<collection>/<group>/{layers,output}`.
//! Layer files are keyed by layer id so that same-named uploads in
//! different folders never collide.

use std::path::{Path, PathBuf};

use futures::future::join_all;
use nftgen_cloud::BlobStore;
use nftgen_core::catalog::{ImageLayer, RunScope};

use crate::error::PipelineError;

/// Blob key of a rendered item.
pub fn composite_key(scope: &RunScope, item_index: i32) -> String {
    format!(
        "composites/{}/{}/{}/{}.png",
        scope.project_id, scope.collection_id, scope.composite_group_id, item_index
    )
}

#[derive(Debug, Clone)]
pub struct Staging {
    root: PathBuf,
}

impl Staging {
    pub fn new(scratch_root: &Path, scope: &RunScope) -> Self {
        Self {
            root: scratch_root
                .join(scope.project_id.to_string())
                .join(scope.collection_id.to_string())
                .join(scope.composite_group_id.to_string()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn layers_dir(&self) -> PathBuf {
        self.root.join("layers")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join("output")
    }

    pub fn output_path(&self, item_index: i32) -> PathBuf {
        self.output_dir().join(format!("{item_index}.png"))
    }

    /// Local file for a layer: `layers/<id>.<ext>`, keeping the source
    /// extension so the decoder can sniff the format.
    pub fn layer_path(&self, layer: &ImageLayer) -> PathBuf {
        let ext = Path::new(&layer.path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("png");
        self.layers_dir().join(format!("{}.{ext}", layer.id))
    }

    pub async fn prepare(&self) -> Result<(), PipelineError> {
        tokio::fs::create_dir_all(self.layers_dir()).await?;
        tokio::fs::create_dir_all(self.output_dir()).await?;
        Ok(())
    }

    /// Download every layer concurrently. Returns the number of failures,
    /// which are logged; missing files are retried on demand later.
    pub async fn prefetch(&self, blobs: &dyn BlobStore, layers: &[ImageLayer]) -> usize {
        let results = join_all(layers.iter().map(|layer| async move {
            let dest = self.layer_path(layer);
            (layer, blobs.download(&layer.path, &dest).await)
        }))
        .await;

        let mut failures = 0;
        for (layer, result) in results {
            if let Err(e) = result {
                failures += 1;
                tracing::warn!(
                    layer_id = layer.id,
                    path = %layer.path,
                    error = %e,
                    "Failed to pre-download layer",
                );
            }
        }
        tracing::debug!(
            layers = layers.len(),
            failures,
            root = %self.root.display(),
            "Pre-downloaded layers",
        );
        failures
    }

    /// Local path of a layer, downloading it first if it is not staged.
    pub async fn ensure_layer(
        &self,
        blobs: &dyn BlobStore,
        layer: &ImageLayer,
    ) -> Result<PathBuf, PipelineError> {
        let dest = self.layer_path(layer);
        if !tokio::fs::try_exists(&dest).await? {
            blobs.download(&layer.path, &dest).await?;
        }
        Ok(dest)
    }

    /// Remove the run's scratch directory. Failures are only logged.
    pub async fn cleanup(&self) {
        match tokio::fs::remove_dir_all(&self.root).await {
            Ok(()) => tracing::debug!(root = %self.root.display(), "Removed scratch directory"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                root = %self.root.display(),
                error = %e,
                "Failed to remove scratch directory",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nftgen_cloud::LocalBlobStore;

    fn scope() -> RunScope {
        RunScope {
            project_id: 1,
            collection_id: 2,
            composite_group_id: 3,
        }
    }

    fn layer(id: i64, path: &str) -> ImageLayer {
        ImageLayer {
            id,
            path: path.into(),
            bytes: 0,
            trait_id: None,
            trait_value_id: None,
            companion_layer_id: None,
            companion_layer_z_index: None,
            trait_set_id: None,
        }
    }

    #[test]
    fn key_and_paths_follow_layout() {
        assert_eq!(composite_key(&scope(), 7), "composites/1/2/3/7.png");

        let staging = Staging::new(Path::new("/scratch"), &scope());
        assert_eq!(staging.root(), Path::new("/scratch/1/2/3"));
        assert_eq!(staging.output_path(4), PathBuf::from("/scratch/1/2/3/output/4.png"));
        assert_eq!(
            staging.layer_path(&layer(9, "hats/crown.webp")),
            PathBuf::from("/scratch/1/2/3/layers/9.webp")
        );
        assert_eq!(
            staging.layer_path(&layer(9, "hats/crown")),
            PathBuf::from("/scratch/1/2/3/layers/9.png")
        );
    }

    #[tokio::test]
    async fn prefetch_reports_missing_and_cleanup_removes_root() {
        let dir = tempfile::tempdir().unwrap();
        let store_root = dir.path().join("store");
        tokio::fs::create_dir_all(store_root.join("layers")).await.unwrap();
        tokio::fs::write(store_root.join("layers/a.png"), b"a").await.unwrap();
        let blobs = LocalBlobStore::new(&store_root, "http://x");

        let staging = Staging::new(&dir.path().join("scratch"), &scope());
        staging.prepare().await.unwrap();
        let layers = vec![layer(1, "layers/a.png"), layer(2, "layers/missing.png")];

        assert_eq!(staging.prefetch(&blobs, &layers).await, 1);
        assert!(staging.layer_path(&layers[0]).exists());
        assert!(staging.ensure_layer(&blobs, &layers[1]).await.is_err());

        staging.cleanup().await;
        assert!(!staging.root().exists());
        staging.cleanup().await;
    }
}
