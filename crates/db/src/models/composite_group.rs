//! Composite group entity model and DTOs.

use nftgen_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A composite group row from the `composite_groups` table.
///
/// One group holds the output of a single generation run.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CompositeGroup {
    pub id: DbId,
    pub project_id: DbId,
    pub collection_id: DbId,
    /// Display permutation of item indices, set by a shuffle.
    pub shuffled_order: Option<Vec<i32>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for opening a new composite group.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCompositeGroup {
    pub project_id: DbId,
    pub collection_id: DbId,
}
