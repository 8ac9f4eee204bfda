//! Conflict rule entity model and DTOs.

use nftgen_core::catalog::{self, ResolutionType};
use nftgen_core::error::CoreError;
use nftgen_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A conflict row from the `conflicts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Conflict {
    pub id: DbId,
    pub collection_id: DbId,
    pub trait1_id: DbId,
    pub trait1_value_id: Option<DbId>,
    pub trait2_id: DbId,
    pub trait2_value_id: Option<DbId>,
    pub resolution_type: String,
    pub trait_set_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Conflict {
    pub fn into_domain(self) -> Result<catalog::Conflict, CoreError> {
        Ok(catalog::Conflict {
            id: self.id,
            trait1_id: self.trait1_id,
            trait1_value_id: self.trait1_value_id,
            trait2_id: self.trait2_id,
            trait2_value_id: self.trait2_value_id,
            resolution_type: ResolutionType::from_name(&self.resolution_type)?,
            trait_set_id: self.trait_set_id,
        })
    }
}

/// DTO for creating a new conflict rule.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateConflict {
    pub collection_id: DbId,
    pub trait1_id: DbId,
    pub trait1_value_id: Option<DbId>,
    pub trait2_id: DbId,
    pub trait2_value_id: Option<DbId>,
    pub resolution_type: ResolutionType,
    pub trait_set_id: Option<DbId>,
}
