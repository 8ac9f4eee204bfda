//! Catalog records the generator reads, and the composite records it writes.
//!
//! These are storage-agnostic: the db crate maps its rows into them and the
//! admin UI owns their lifecycle. The generator treats every catalog type as
//! read-only.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

/// How a collection's items are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionType {
    /// Items are layered from trait artwork.
    Generative,
    /// Items are uploaded finished; one image layer per item index.
    Prerendered,
}

impl CollectionType {
    /// Parse from the database `collection_type` column.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "generative" => Ok(Self::Generative),
            "prerendered" => Ok(Self::Prerendered),
            other => Err(CoreError::Validation(format!(
                "Unknown collection type '{other}'"
            ))),
        }
    }

    /// Database name value.
    pub fn name(self) -> &'static str {
        match self {
            Self::Generative => "generative",
            Self::Prerendered => "prerendered",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub collection_type: CollectionType,
    /// Total configured supply across all trait sets.
    pub supply: i32,
}

/// Partition of a collection's traits, layers and supply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitSet {
    pub id: DbId,
    pub name: String,
    pub supply: i32,
}

// ---------------------------------------------------------------------------
// Traits and values
// ---------------------------------------------------------------------------

/// A categorical attribute such as "Background" or "Eyes".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trait {
    pub id: DbId,
    pub name: String,
    /// Layering order; lower is drawn first.
    pub z_index: i32,
    /// Appears in metadata only; has no artwork.
    pub is_metadata_only: bool,
    /// Has artwork but is left out of metadata attributes.
    pub is_artwork_only: bool,
    /// Values are drawn without replacement, one per item.
    pub is_always_unique: bool,
    /// Ignored when computing the uniqueness hash.
    pub exclude_from_duplicate_detection: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitValue {
    pub id: DbId,
    pub trait_id: DbId,
    pub name: String,
    /// Probability weight in `[0, 1]`.
    pub rarity: f64,
}

/// One trait's selection for an item. `None` means the trait was cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitValuePair {
    pub trait_id: DbId,
    pub trait_value_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Image layers
// ---------------------------------------------------------------------------

/// An uploaded artwork asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageLayer {
    pub id: DbId,
    /// Object key in the blob store.
    pub path: String,
    pub bytes: i64,
    pub trait_id: Option<DbId>,
    pub trait_value_id: Option<DbId>,
    /// A second layer that always accompanies this one (shadow, glow).
    pub companion_layer_id: Option<DbId>,
    /// Depth at which the companion is drawn.
    pub companion_layer_z_index: Option<i32>,
    pub trait_set_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Conflicts
// ---------------------------------------------------------------------------

/// What to do when a conflict rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionType {
    Trait1None,
    Trait2None,
    Trait1Random,
    Trait2Random,
}

impl ResolutionType {
    /// Parse from the database `resolution_type` column.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "trait1_none" => Ok(Self::Trait1None),
            "trait2_none" => Ok(Self::Trait2None),
            "trait1_random" => Ok(Self::Trait1Random),
            "trait2_random" => Ok(Self::Trait2Random),
            other => Err(CoreError::Validation(format!(
                "Unknown conflict resolution type '{other}'"
            ))),
        }
    }

    /// Database name value.
    pub fn name(self) -> &'static str {
        match self {
            Self::Trait1None => "trait1_none",
            Self::Trait2None => "trait2_none",
            Self::Trait1Random => "trait1_random",
            Self::Trait2Random => "trait2_random",
        }
    }
}

/// A pairwise rule between two trait selections.
///
/// A `None` value id means "any non-null value of that trait".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    pub id: DbId,
    pub trait1_id: DbId,
    pub trait1_value_id: Option<DbId>,
    pub trait2_id: DbId,
    pub trait2_value_id: Option<DbId>,
    pub resolution_type: ResolutionType,
    /// `None` for collection-wide rules.
    pub trait_set_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Composites
// ---------------------------------------------------------------------------

/// Identifies one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunScope {
    pub project_id: DbId,
    pub collection_id: DbId,
    pub composite_group_id: DbId,
}

/// One resolved trait of a generated item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeTrait {
    pub trait_id: DbId,
    pub trait_value_id: Option<DbId>,
    pub image_layer_id: Option<DbId>,
}

/// A composite ready to be persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewComposite {
    pub item_index: i32,
    pub external_url: String,
    pub traits: Vec<CompositeTrait>,
    pub traits_hash: String,
}

/// A persisted composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageComposite {
    pub id: DbId,
    pub composite_group_id: DbId,
    pub item_index: i32,
    pub external_url: String,
    pub traits: Vec<CompositeTrait>,
    pub traits_hash: String,
}
