//! Image composite entity model.

use nftgen_core::catalog::{self, CompositeTrait};
use nftgen_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// An image composite row from the `image_composites` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ImageComposite {
    pub id: DbId,
    pub project_id: DbId,
    pub collection_id: DbId,
    pub composite_group_id: DbId,
    pub item_index: i32,
    pub external_url: String,
    pub traits: Json<Vec<CompositeTrait>>,
    pub traits_hash: String,
    pub created_at: Timestamp,
}

impl ImageComposite {
    pub fn into_domain(self) -> catalog::ImageComposite {
        catalog::ImageComposite {
            id: self.id,
            composite_group_id: self.composite_group_id,
            item_index: self.item_index,
            external_url: self.external_url,
            traits: self.traits.0,
            traits_hash: self.traits_hash,
        }
    }
}
