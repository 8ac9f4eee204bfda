//! Trait entity model and DTOs.

use nftgen_core::catalog;
use nftgen_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A trait row from the `traits` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Trait {
    pub id: DbId,
    pub collection_id: DbId,
    pub name: String,
    pub z_index: i32,
    pub is_metadata_only: bool,
    pub is_artwork_only: bool,
    pub is_always_unique: bool,
    pub exclude_from_duplicate_detection: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Trait {
    pub fn into_domain(self) -> catalog::Trait {
        catalog::Trait {
            id: self.id,
            name: self.name,
            z_index: self.z_index,
            is_metadata_only: self.is_metadata_only,
            is_artwork_only: self.is_artwork_only,
            is_always_unique: self.is_always_unique,
            exclude_from_duplicate_detection: self.exclude_from_duplicate_detection,
        }
    }
}

/// DTO for creating a new trait. Flags default to `false`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTrait {
    pub collection_id: DbId,
    pub name: String,
    pub z_index: i32,
    pub is_metadata_only: Option<bool>,
    pub is_artwork_only: Option<bool>,
    pub is_always_unique: Option<bool>,
    pub exclude_from_duplicate_detection: Option<bool>,
}
