//! Read access to the generation catalog.

use async_trait::async_trait;
use nftgen_core::catalog::{Collection, Conflict, ImageLayer, Trait, TraitSet, TraitValue};
use nftgen_core::types::DbId;

use crate::error::PipelineError;

#[async_trait]
pub trait CatalogReader: Send + Sync {
    async fn collection(
        &self,
        project_id: DbId,
        collection_id: DbId,
    ) -> Result<Option<Collection>, PipelineError>;

    async fn trait_set(
        &self,
        collection_id: DbId,
        trait_set_id: DbId,
    ) -> Result<Option<TraitSet>, PipelineError>;

    /// Traits in layering order, limited to a trait set when one is given.
    async fn traits(
        &self,
        collection_id: DbId,
        trait_set_id: Option<DbId>,
    ) -> Result<Vec<Trait>, PipelineError>;

    /// A trait's values in catalog order, minus `exclude_ids`.
    async fn trait_values(
        &self,
        trait_id: DbId,
        exclude_ids: &[DbId],
    ) -> Result<Vec<TraitValue>, PipelineError>;

    /// Every layer of the collection, in catalog order.
    async fn image_layers(&self, collection_id: DbId) -> Result<Vec<ImageLayer>, PipelineError>;

    /// Rules in application order. Collection-wide rules are always included.
    async fn conflicts(
        &self,
        collection_id: DbId,
        trait_set_id: Option<DbId>,
    ) -> Result<Vec<Conflict>, PipelineError>;
}
