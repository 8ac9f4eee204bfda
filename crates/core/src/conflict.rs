//! Conflict rules between trait selections (ConflictResolver).
//!
//! Rules are applied in catalog order and each one sees the selections left
//! by the rules before it, so a later rule may fire on an earlier rule's
//! redraw. There is no cycle detection: a catalog whose rules contradict each
//! other can leave an item in whatever state the last rule produced.

use rand::Rng;

use crate::catalog::{Conflict, ResolutionType, Trait, TraitValuePair};
use crate::pool::ValuePool;
use crate::rarity;
use crate::types::DbId;

/// Whether `conflict` fires against the current selections.
///
/// Both traits must be present. For each side, a rule value of `None`
/// matches any non-null selection; otherwise the selection must equal it.
pub fn conflict_fires(conflict: &Conflict, selections: &[TraitValuePair]) -> bool {
    let side1 = find_pair(selections, conflict.trait1_id);
    let side2 = find_pair(selections, conflict.trait2_id);

    match (side1, side2) {
        (Some(a), Some(b)) => {
            side_matches(conflict.trait1_value_id, a.trait_value_id)
                && side_matches(conflict.trait2_value_id, b.trait_value_id)
        }
        _ => false,
    }
}

fn find_pair(selections: &[TraitValuePair], trait_id: DbId) -> Option<&TraitValuePair> {
    selections.iter().find(|p| p.trait_id == trait_id)
}

fn side_matches(rule_value: Option<DbId>, selected: Option<DbId>) -> bool {
    match (rule_value, selected) {
        (_, None) => false,
        (None, Some(_)) => true,
        (Some(rule), Some(sel)) => rule == sel,
    }
}

/// Apply every conflict in order, mutating `selections`.
///
/// A fired rule makes exactly one change: clear one side, or redraw one side
/// from `pool` excluding its previous value. A redraw that yields nothing
/// clears the value.
pub fn resolve<R: Rng + ?Sized>(
    mut selections: Vec<TraitValuePair>,
    conflicts: &[Conflict],
    traits: &[Trait],
    pool: &ValuePool,
    rng: &mut R,
) -> Vec<TraitValuePair> {
    for conflict in conflicts {
        if !conflict_fires(conflict, &selections) {
            continue;
        }

        let (target, redraw) = match conflict.resolution_type {
            ResolutionType::Trait1None => (conflict.trait1_id, false),
            ResolutionType::Trait2None => (conflict.trait2_id, false),
            ResolutionType::Trait1Random => (conflict.trait1_id, true),
            ResolutionType::Trait2Random => (conflict.trait2_id, true),
        };

        let Some(pair) = selections.iter_mut().find(|p| p.trait_id == target) else {
            continue;
        };

        pair.trait_value_id = if redraw {
            let always_unique = traits
                .iter()
                .find(|t| t.id == target)
                .is_some_and(|t| t.is_always_unique);
            rarity::pick(pool.values(target), always_unique, pair.trait_value_id, rng)
                .map(|v| v.id)
        } else {
            None
        };
    }

    selections
}
