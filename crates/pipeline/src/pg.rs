//! PostgreSQL-backed catalog and composite store.

use async_trait::async_trait;
use nftgen_core::catalog::{
    Collection, Conflict, ImageComposite, ImageLayer, NewComposite, RunScope, Trait, TraitSet,
    TraitValue,
};
use nftgen_core::types::DbId;
use nftgen_db::repositories::{
    CollectionRepo, CompositeGroupRepo, ConflictRepo, ImageCompositeRepo, ImageLayerRepo,
    TraitRepo, TraitSetRepo, TraitValueRepo,
};
use nftgen_db::DbPool;

use crate::catalog::CatalogReader;
use crate::error::PipelineError;
use crate::store::CompositeStore;

#[derive(Debug, Clone)]
pub struct PgCatalog {
    pool: DbPool,
}

impl PgCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogReader for PgCatalog {
    async fn collection(
        &self,
        project_id: DbId,
        collection_id: DbId,
    ) -> Result<Option<Collection>, PipelineError> {
        let row = CollectionRepo::find(&self.pool, project_id, collection_id).await?;
        Ok(row.map(|r| r.into_domain()).transpose()?)
    }

    async fn trait_set(
        &self,
        collection_id: DbId,
        trait_set_id: DbId,
    ) -> Result<Option<TraitSet>, PipelineError> {
        let row = TraitSetRepo::find(&self.pool, collection_id, trait_set_id).await?;
        Ok(row.map(|r| r.into_domain()))
    }

    async fn traits(
        &self,
        collection_id: DbId,
        trait_set_id: Option<DbId>,
    ) -> Result<Vec<Trait>, PipelineError> {
        let rows = TraitRepo::list_for_generation(&self.pool, collection_id, trait_set_id).await?;
        Ok(rows.into_iter().map(|r| r.into_domain()).collect())
    }

    async fn trait_values(
        &self,
        trait_id: DbId,
        exclude_ids: &[DbId],
    ) -> Result<Vec<TraitValue>, PipelineError> {
        let rows = TraitValueRepo::list_by_trait(&self.pool, trait_id, exclude_ids).await?;
        Ok(rows.into_iter().map(|r| r.into_domain()).collect())
    }

    async fn image_layers(&self, collection_id: DbId) -> Result<Vec<ImageLayer>, PipelineError> {
        let rows = ImageLayerRepo::list_by_collection(&self.pool, collection_id).await?;
        Ok(rows.into_iter().map(|r| r.into_domain()).collect())
    }

    async fn conflicts(
        &self,
        collection_id: DbId,
        trait_set_id: Option<DbId>,
    ) -> Result<Vec<Conflict>, PipelineError> {
        let rows = ConflictRepo::list_for_generation(&self.pool, collection_id, trait_set_id).await?;
        rows.into_iter()
            .map(|r| r.into_domain().map_err(PipelineError::from))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct PgCompositeStore {
    pool: DbPool,
}

impl PgCompositeStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompositeStore for PgCompositeStore {
    async fn create_composite(
        &self,
        scope: &RunScope,
        composite: &NewComposite,
    ) -> Result<ImageComposite, PipelineError> {
        let row = ImageCompositeRepo::create(&self.pool, scope, composite).await?;
        Ok(row.into_domain())
    }

    async fn exists_with_hash(
        &self,
        scope: &RunScope,
        traits_hash: &str,
    ) -> Result<bool, PipelineError> {
        Ok(ImageCompositeRepo::exists_with_hash(&self.pool, scope, traits_hash).await?)
    }

    async fn used_value_ids(
        &self,
        scope: &RunScope,
        trait_id: DbId,
    ) -> Result<Vec<DbId>, PipelineError> {
        Ok(ImageCompositeRepo::used_value_ids(&self.pool, scope, trait_id).await?)
    }

    async fn list_composites(
        &self,
        composite_group_id: DbId,
    ) -> Result<Vec<ImageComposite>, PipelineError> {
        let rows = ImageCompositeRepo::list_by_group(&self.pool, composite_group_id).await?;
        Ok(rows.into_iter().map(|r| r.into_domain()).collect())
    }

    async fn set_shuffled_order(
        &self,
        composite_group_id: DbId,
        order: &[i32],
    ) -> Result<bool, PipelineError> {
        Ok(CompositeGroupRepo::set_shuffled_order(&self.pool, composite_group_id, order).await?)
    }
}
