//! Persistence of generated composites.
//!
//! Batches for one composite group must run one at a time: duplicate
//! detection reads the group's existing hashes and nothing locks the group
//! between the check and the insert.

use async_trait::async_trait;
use nftgen_core::catalog::{ImageComposite, NewComposite, RunScope};
use nftgen_core::types::DbId;

use crate::error::PipelineError;

#[async_trait]
pub trait CompositeStore: Send + Sync {
    async fn create_composite(
        &self,
        scope: &RunScope,
        composite: &NewComposite,
    ) -> Result<ImageComposite, PipelineError>;

    /// Whether an item with `traits_hash` already exists in the run's group.
    async fn exists_with_hash(
        &self,
        scope: &RunScope,
        traits_hash: &str,
    ) -> Result<bool, PipelineError>;

    /// Values of `trait_id` already taken by items in the run's group.
    async fn used_value_ids(
        &self,
        scope: &RunScope,
        trait_id: DbId,
    ) -> Result<Vec<DbId>, PipelineError>;

    /// All items of a group ordered by item index.
    async fn list_composites(
        &self,
        composite_group_id: DbId,
    ) -> Result<Vec<ImageComposite>, PipelineError>;

    /// Returns `false` if the group does not exist.
    async fn set_shuffled_order(
        &self,
        composite_group_id: DbId,
        order: &[i32],
    ) -> Result<bool, PipelineError>;
}
