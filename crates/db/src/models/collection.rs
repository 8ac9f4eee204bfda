//! Collection entity model and DTOs.

use nftgen_core::catalog::{self, CollectionType};
use nftgen_core::error::CoreError;
use nftgen_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A collection row from the `collections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Collection {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub description: Option<String>,
    /// `generative` or `prerendered`.
    pub collection_type: String,
    pub supply: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Collection {
    pub fn into_domain(self) -> Result<catalog::Collection, CoreError> {
        Ok(catalog::Collection {
            id: self.id,
            project_id: self.project_id,
            name: self.name,
            description: self.description,
            collection_type: CollectionType::from_name(&self.collection_type)?,
            supply: self.supply,
        })
    }
}

/// DTO for creating a new collection.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCollection {
    pub project_id: DbId,
    pub name: String,
    pub description: Option<String>,
    /// Defaults to `generative` if omitted.
    pub collection_type: Option<CollectionType>,
    pub supply: i32,
}
