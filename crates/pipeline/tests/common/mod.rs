//! In-memory catalog and composite store, plus artwork helpers.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use image::{ImageFormat, Rgba, RgbaImage};
use nftgen_cloud::{BlobStore, LocalBlobStore, StorageError};
use nftgen_core::catalog::{
    Collection, CollectionType, Conflict, ImageComposite, ImageLayer, NewComposite, RunScope,
    Trait, TraitSet, TraitValue,
};
use nftgen_core::types::DbId;
use nftgen_pipeline::{CatalogReader, CompositeStore, GenerationContext, PipelineError};
use tempfile::TempDir;

pub const PROJECT_ID: DbId = 1;
pub const COLLECTION_ID: DbId = 2;
pub const GROUP_ID: DbId = 3;

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct MemoryCatalog {
    pub collection: Collection,
    pub trait_sets: Vec<TraitSet>,
    pub traits: Vec<Trait>,
    pub values: Vec<TraitValue>,
    pub layers: Vec<ImageLayer>,
    pub conflicts: Vec<Conflict>,
}

impl MemoryCatalog {
    pub fn new(collection_type: CollectionType, supply: i32) -> Self {
        Self {
            collection: Collection {
                id: COLLECTION_ID,
                project_id: PROJECT_ID,
                name: "Critters".into(),
                description: Some("Test collection".into()),
                collection_type,
                supply,
            },
            trait_sets: Vec::new(),
            traits: Vec::new(),
            values: Vec::new(),
            layers: Vec::new(),
            conflicts: Vec::new(),
        }
    }

    /// Add a trait with one value per rarity and one layer per value.
    ///
    /// Value ids are `trait_id * 100 + n`, layer ids `trait_id * 1000 + n`.
    pub fn add_trait(&mut self, trait_id: DbId, z_index: i32, rarities: &[f64]) -> Vec<DbId> {
        self.traits.push(Trait {
            id: trait_id,
            name: format!("Trait {trait_id}"),
            z_index,
            is_metadata_only: false,
            is_artwork_only: false,
            is_always_unique: false,
            exclude_from_duplicate_detection: false,
        });
        let mut ids = Vec::new();
        for (n, rarity) in rarities.iter().enumerate() {
            let value_id = trait_id * 100 + n as DbId;
            self.values.push(TraitValue {
                id: value_id,
                trait_id,
                name: format!("Value {value_id}"),
                rarity: *rarity,
            });
            self.layers.push(layer(trait_id * 1000 + n as DbId, Some(trait_id), Some(value_id)));
            ids.push(value_id);
        }
        ids
    }

    pub fn trait_mut(&mut self, trait_id: DbId) -> &mut Trait {
        self.traits
            .iter_mut()
            .find(|t| t.id == trait_id)
            .expect("trait exists")
    }
}

pub fn layer(id: DbId, trait_id: Option<DbId>, trait_value_id: Option<DbId>) -> ImageLayer {
    ImageLayer {
        id,
        path: format!("layers/{id}.png"),
        bytes: 64,
        trait_id,
        trait_value_id,
        companion_layer_id: None,
        companion_layer_z_index: None,
        trait_set_id: None,
    }
}

#[async_trait]
impl CatalogReader for MemoryCatalog {
    async fn collection(
        &self,
        project_id: DbId,
        collection_id: DbId,
    ) -> Result<Option<Collection>, PipelineError> {
        Ok(Some(self.collection.clone())
            .filter(|c| c.project_id == project_id && c.id == collection_id))
    }

    async fn trait_set(
        &self,
        _collection_id: DbId,
        trait_set_id: DbId,
    ) -> Result<Option<TraitSet>, PipelineError> {
        Ok(self.trait_sets.iter().find(|s| s.id == trait_set_id).cloned())
    }

    async fn traits(
        &self,
        _collection_id: DbId,
        _trait_set_id: Option<DbId>,
    ) -> Result<Vec<Trait>, PipelineError> {
        let mut traits = self.traits.clone();
        traits.sort_by_key(|t| (t.z_index, t.id));
        Ok(traits)
    }

    async fn trait_values(
        &self,
        trait_id: DbId,
        exclude_ids: &[DbId],
    ) -> Result<Vec<TraitValue>, PipelineError> {
        Ok(self
            .values
            .iter()
            .filter(|v| v.trait_id == trait_id && !exclude_ids.contains(&v.id))
            .cloned()
            .collect())
    }

    async fn image_layers(&self, _collection_id: DbId) -> Result<Vec<ImageLayer>, PipelineError> {
        Ok(self.layers.clone())
    }

    async fn conflicts(
        &self,
        _collection_id: DbId,
        trait_set_id: Option<DbId>,
    ) -> Result<Vec<Conflict>, PipelineError> {
        Ok(self
            .conflicts
            .iter()
            .filter(|c| c.trait_set_id.is_none() || c.trait_set_id == trait_set_id)
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Composite store
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryStore {
    composites: Mutex<Vec<(RunScope, ImageComposite)>>,
    orders: Mutex<HashMap<DbId, Vec<i32>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let store = Self::default();
        store.orders.lock().unwrap().insert(GROUP_ID, Vec::new());
        store
    }

    pub fn all(&self) -> Vec<ImageComposite> {
        self.composites
            .lock()
            .unwrap()
            .iter()
            .map(|(_, c)| c.clone())
            .collect()
    }

    pub fn order(&self, group: DbId) -> Option<Vec<i32>> {
        self.orders.lock().unwrap().get(&group).cloned()
    }
}

#[async_trait]
impl CompositeStore for MemoryStore {
    async fn create_composite(
        &self,
        scope: &RunScope,
        composite: &NewComposite,
    ) -> Result<ImageComposite, PipelineError> {
        let mut composites = self.composites.lock().unwrap();
        let created = ImageComposite {
            id: composites.len() as DbId + 1,
            composite_group_id: scope.composite_group_id,
            item_index: composite.item_index,
            external_url: composite.external_url.clone(),
            traits: composite.traits.clone(),
            traits_hash: composite.traits_hash.clone(),
        };
        composites.push((*scope, created.clone()));
        Ok(created)
    }

    async fn exists_with_hash(
        &self,
        scope: &RunScope,
        traits_hash: &str,
    ) -> Result<bool, PipelineError> {
        Ok(self
            .composites
            .lock()
            .unwrap()
            .iter()
            .any(|(s, c)| s == scope && c.traits_hash == traits_hash))
    }

    async fn used_value_ids(
        &self,
        scope: &RunScope,
        trait_id: DbId,
    ) -> Result<Vec<DbId>, PipelineError> {
        let mut used: Vec<DbId> = self
            .composites
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| s == scope)
            .flat_map(|(_, c)| c.traits.clone())
            .filter(|ct| ct.trait_id == trait_id)
            .filter_map(|ct| ct.trait_value_id)
            .collect();
        used.sort_unstable();
        used.dedup();
        Ok(used)
    }

    async fn list_composites(
        &self,
        composite_group_id: DbId,
    ) -> Result<Vec<ImageComposite>, PipelineError> {
        let mut items: Vec<_> = self
            .all()
            .into_iter()
            .filter(|c| c.composite_group_id == composite_group_id)
            .collect();
        items.sort_by_key(|c| c.item_index);
        Ok(items)
    }

    async fn set_shuffled_order(
        &self,
        composite_group_id: DbId,
        order: &[i32],
    ) -> Result<bool, PipelineError> {
        let mut orders = self.orders.lock().unwrap();
        match orders.get_mut(&composite_group_id) {
            Some(slot) => {
                *slot = order.to_vec();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ---------------------------------------------------------------------------
// Blob stores
// ---------------------------------------------------------------------------

/// Downloads work; every upload fails.
#[derive(Debug)]
pub struct FailingUploads(pub LocalBlobStore);

#[async_trait]
impl BlobStore for FailingUploads {
    async fn download(&self, path: &str, dest: &Path) -> Result<(), StorageError> {
        self.0.download(path, dest).await
    }

    async fn upload(&self, _local: &Path, path: &str) -> Result<String, StorageError> {
        Err(StorageError::S3 {
            bucket: "test-bucket".into(),
            key: path.into(),
            message: "access denied".into(),
        })
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct Harness {
    pub dir: TempDir,
    pub blobs: LocalBlobStore,
    pub store: Arc<MemoryStore>,
}

impl Harness {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let blobs = LocalBlobStore::new(dir.path().join("store"), "https://cdn.test");
        Self {
            dir,
            blobs,
            store: Arc::new(MemoryStore::new()),
        }
    }

    pub fn scratch_root(&self) -> PathBuf {
        self.dir.path().join("scratch")
    }

    pub fn run_root(&self) -> PathBuf {
        self.scratch_root()
            .join(PROJECT_ID.to_string())
            .join(COLLECTION_ID.to_string())
            .join(GROUP_ID.to_string())
    }

    /// Write a solid-colour 4x4 PNG for every layer of `catalog`.
    pub fn upload_artwork(&self, catalog: &MemoryCatalog) {
        for layer in &catalog.layers {
            let shade = (layer.id % 251) as u8;
            write_png(&self.blobs.object_path(&layer.path), [shade, 255 - shade, 128, 255]);
        }
    }

    pub fn context(&self, catalog: MemoryCatalog) -> GenerationContext {
        self.context_with_blobs(catalog, Arc::new(self.blobs.clone()))
    }

    pub fn context_with_blobs(
        &self,
        catalog: MemoryCatalog,
        blobs: Arc<dyn BlobStore>,
    ) -> GenerationContext {
        GenerationContext {
            catalog: Arc::new(catalog),
            store: self.store.clone(),
            blobs,
            scratch_root: self.scratch_root(),
        }
    }
}

pub fn write_png(path: &Path, rgba: [u8; 4]) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let img = RgbaImage::from_pixel(4, 4, Rgba(rgba));
    img.save_with_format(path, ImageFormat::Png).unwrap();
}
