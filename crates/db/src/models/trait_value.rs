//! Trait value entity model and DTOs.

use nftgen_core::catalog;
use nftgen_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A trait value row from the `trait_values` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TraitValue {
    pub id: DbId,
    pub trait_id: DbId,
    pub name: String,
    pub rarity: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TraitValue {
    pub fn into_domain(self) -> catalog::TraitValue {
        catalog::TraitValue {
            id: self.id,
            trait_id: self.trait_id,
            name: self.name,
            rarity: self.rarity,
        }
    }
}

/// DTO for creating a new trait value.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTraitValue {
    pub trait_id: DbId,
    pub name: String,
    pub rarity: f64,
}
