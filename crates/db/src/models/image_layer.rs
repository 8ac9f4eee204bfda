//! Image layer entity model and DTOs.

use nftgen_core::catalog;
use nftgen_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An image layer row from the `image_layers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ImageLayer {
    pub id: DbId,
    pub collection_id: DbId,
    pub path: String,
    pub bytes: i64,
    pub trait_id: Option<DbId>,
    pub trait_value_id: Option<DbId>,
    pub companion_layer_id: Option<DbId>,
    pub companion_layer_z_index: Option<i32>,
    pub trait_set_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ImageLayer {
    pub fn into_domain(self) -> catalog::ImageLayer {
        catalog::ImageLayer {
            id: self.id,
            path: self.path,
            bytes: self.bytes,
            trait_id: self.trait_id,
            trait_value_id: self.trait_value_id,
            companion_layer_id: self.companion_layer_id,
            companion_layer_z_index: self.companion_layer_z_index,
            trait_set_id: self.trait_set_id,
        }
    }
}

/// DTO for registering an uploaded layer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateImageLayer {
    pub collection_id: DbId,
    pub path: String,
    pub bytes: i64,
    pub trait_id: Option<DbId>,
    pub trait_value_id: Option<DbId>,
    pub companion_layer_id: Option<DbId>,
    pub companion_layer_z_index: Option<i32>,
    pub trait_set_id: Option<DbId>,
}
