//! Per-item metadata documents consumed by the minting pipeline.
//!
//! Shape follows the common marketplace convention:
//! `{ name, description, image, attributes: [{ trait_type, value }] }`.

use serde::Serialize;

use crate::catalog::{Collection, CompositeTrait, Trait, TraitValue};

/// One `attributes` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: String,
}

/// Metadata document for a single item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataDocument {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub image: String,
    pub attributes: Vec<Attribute>,
}

/// Build the metadata document for one composite.
///
/// Artwork-only traits and cleared values are left out. Traits and values
/// missing from the catalog are skipped.
pub fn build_metadata_document(
    collection: &Collection,
    item_index: i32,
    external_url: &str,
    composite_traits: &[CompositeTrait],
    traits: &[Trait],
    values: &[TraitValue],
) -> MetadataDocument {
    let attributes = composite_traits
        .iter()
        .filter_map(|ct| {
            let t = traits.iter().find(|t| t.id == ct.trait_id)?;
            if t.is_artwork_only {
                return None;
            }
            let value_id = ct.trait_value_id?;
            let v = values.iter().find(|v| v.id == value_id)?;
            Some(Attribute {
                trait_type: t.name.clone(),
                value: v.name.clone(),
            })
        })
        .collect();

    MetadataDocument {
        name: format!("{} #{}", collection.name, item_index),
        description: collection.description.clone(),
        image: external_url.to_string(),
        attributes,
    }
}
