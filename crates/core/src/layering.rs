//! Layer resolution and render ordering with companion injection.

use std::collections::HashMap;

use crate::catalog::{CompositeTrait, ImageLayer, Trait, TraitValuePair};
use crate::types::DbId;

/// One layer to draw, at its effective depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderEntry<'a> {
    pub layer: &'a ImageLayer,
    pub z_index: i32,
    pub is_companion: bool,
}

/// Find the artwork for a trait value.
///
/// A layer scoped to `trait_set_id` wins over an unscoped one; layers scoped
/// to a different trait set are never used.
pub fn resolve_image_layer(
    trait_value_id: DbId,
    trait_set_id: Option<DbId>,
    layers: &[ImageLayer],
) -> Option<&ImageLayer> {
    let mut fallback = None;
    for layer in layers
        .iter()
        .filter(|l| l.trait_value_id == Some(trait_value_id))
    {
        match layer.trait_set_id {
            Some(scoped) if Some(scoped) == trait_set_id => return Some(layer),
            None if fallback.is_none() => fallback = Some(layer),
            _ => {}
        }
    }
    fallback
}

/// Order selections by trait z-index, ties by the trait's catalog position.
///
/// Selections for traits missing from `traits` are dropped.
pub fn z_ordered<'a>(
    pairs: &[TraitValuePair],
    traits: &'a [Trait],
) -> Vec<(&'a Trait, TraitValuePair)> {
    let positions: HashMap<DbId, (usize, &Trait)> = traits
        .iter()
        .enumerate()
        .map(|(pos, t)| (t.id, (pos, t)))
        .collect();

    let mut ordered: Vec<(usize, &Trait, TraitValuePair)> = pairs
        .iter()
        .filter_map(|p| positions.get(&p.trait_id).map(|(pos, t)| (*pos, *t, *p)))
        .collect();
    ordered.sort_by_key(|(pos, t, _)| (t.z_index, *pos));
    ordered.into_iter().map(|(_, t, p)| (t, p)).collect()
}

/// Attach the resolved image layer to every selection, in z order.
///
/// Metadata-only traits and null values carry no layer.
pub fn resolve_composite_traits(
    pairs: &[TraitValuePair],
    traits: &[Trait],
    layers: &[ImageLayer],
    trait_set_id: Option<DbId>,
) -> Vec<CompositeTrait> {
    z_ordered(pairs, traits)
        .into_iter()
        .map(|(t, pair)| {
            let image_layer_id = match pair.trait_value_id {
                Some(value_id) if !t.is_metadata_only => {
                    resolve_image_layer(value_id, trait_set_id, layers).map(|l| l.id)
                }
                _ => None,
            };
            CompositeTrait {
                trait_id: pair.trait_id,
                trait_value_id: pair.trait_value_id,
                image_layer_id,
            }
        })
        .collect()
}

/// Build the final draw list, bottom first.
///
/// Each resolved layer is drawn at its trait's z-index. A declared companion
/// is injected at its own `companion_layer_z_index` (the primary's depth if
/// unset) and the list is stably re-sorted, so on equal depth a primary stays
/// ahead of the companion that followed it.
pub fn build_render_list<'a>(
    composite_traits: &[CompositeTrait],
    traits: &[Trait],
    layers: &'a [ImageLayer],
) -> Vec<RenderEntry<'a>> {
    let by_id: HashMap<DbId, &ImageLayer> = layers.iter().map(|l| (l.id, l)).collect();
    let mut entries = Vec::new();

    for ct in composite_traits {
        let Some(layer) = ct.image_layer_id.and_then(|id| by_id.get(&id).copied()) else {
            continue;
        };
        let Some(t) = traits.iter().find(|t| t.id == ct.trait_id) else {
            continue;
        };

        entries.push(RenderEntry {
            layer,
            z_index: t.z_index,
            is_companion: false,
        });

        // Dangling companion ids are reported by `missing_companions`.
        if let Some(companion) = layer
            .companion_layer_id
            .and_then(|id| by_id.get(&id).copied())
        {
            entries.push(RenderEntry {
                layer: companion,
                z_index: layer.companion_layer_z_index.unwrap_or(t.z_index),
                is_companion: true,
            });
        }
    }

    entries.sort_by_key(|e| e.z_index);
    entries
}

/// `(layer_id, companion_layer_id)` for every companion reference that does
/// not resolve to a layer in `layers`.
pub fn missing_companions(layers: &[ImageLayer]) -> Vec<(DbId, DbId)> {
    layers
        .iter()
        .filter_map(|l| l.companion_layer_id.map(|c| (l.id, c)))
        .filter(|(_, c)| !layers.iter().any(|l| l.id == *c))
        .collect()
}
