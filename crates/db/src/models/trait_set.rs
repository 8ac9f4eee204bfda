//! Trait set entity model and DTOs.

use nftgen_core::catalog;
use nftgen_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A trait set row from the `trait_sets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TraitSet {
    pub id: DbId,
    pub collection_id: DbId,
    pub name: String,
    pub supply: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TraitSet {
    pub fn into_domain(self) -> catalog::TraitSet {
        catalog::TraitSet {
            id: self.id,
            name: self.name,
            supply: self.supply,
        }
    }
}

/// DTO for creating a new trait set.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTraitSet {
    pub collection_id: DbId,
    pub name: String,
    pub supply: i32,
}
