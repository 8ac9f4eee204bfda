//! Canonical trait-combination hash (UniquenessGuard).
//!
//! The hash is the concatenation of the selected value ids, ordered by trait
//! z-index, with no separator. Existing composite groups store hashes in this
//! exact form, so the format must not change even though differently
//! segmented id sequences can in theory collide.

use std::collections::HashMap;

use crate::catalog::{Trait, TraitValuePair};
use crate::types::DbId;

/// Compute the duplicate-detection hash of an item's selections.
///
/// Pairs are ordered by their trait's z-index, ties by the trait's position
/// in `traits`. Skipped: metadata-only traits, traits excluded from duplicate
/// detection, null values, and traits missing from `traits`.
pub fn traits_hash(pairs: &[TraitValuePair], traits: &[Trait]) -> String {
    let positions: HashMap<DbId, (i32, usize, &Trait)> = traits
        .iter()
        .enumerate()
        .map(|(pos, t)| (t.id, (t.z_index, pos, t)))
        .collect();

    let mut keyed: Vec<((i32, usize), DbId)> = pairs
        .iter()
        .filter_map(|pair| {
            let (z, pos, t) = positions.get(&pair.trait_id)?;
            if t.is_metadata_only || t.exclude_from_duplicate_detection {
                return None;
            }
            pair.trait_value_id.map(|value_id| ((*z, *pos), value_id))
        })
        .collect();

    keyed.sort_by_key(|(key, _)| *key);

    keyed
        .into_iter()
        .map(|(_, value_id)| value_id.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trait_(id: DbId, z_index: i32) -> Trait {
        Trait {
            id,
            name: format!("t{id}"),
            z_index,
            is_metadata_only: false,
            is_artwork_only: false,
            is_always_unique: false,
            exclude_from_duplicate_detection: false,
        }
    }

    fn pair(trait_id: DbId, value: Option<DbId>) -> TraitValuePair {
        TraitValuePair {
            trait_id,
            trait_value_id: value,
        }
    }

    #[test]
    fn concatenates_in_z_order() {
        let traits = vec![trait_(1, 5), trait_(2, 1), trait_(3, 3)];
        let pairs = vec![pair(1, Some(101)), pair(2, Some(202)), pair(3, Some(303))];
        assert_eq!(traits_hash(&pairs, &traits), "202303101");
    }

    #[test]
    fn invariant_to_input_order() {
        let traits = vec![trait_(1, 0), trait_(2, 1), trait_(3, 1)];
        let a = vec![pair(1, Some(7)), pair(2, Some(8)), pair(3, Some(9))];
        let b = vec![pair(3, Some(9)), pair(1, Some(7)), pair(2, Some(8))];
        assert_eq!(traits_hash(&a, &traits), traits_hash(&b, &traits));
        assert_eq!(traits_hash(&a, &traits), "789");
    }

    #[test]
    fn skips_null_metadata_only_and_excluded() {
        let mut meta = trait_(2, 1);
        meta.is_metadata_only = true;
        let mut excluded = trait_(3, 2);
        excluded.exclude_from_duplicate_detection = true;
        let traits = vec![trait_(1, 0), meta, excluded, trait_(4, 3)];

        let pairs = vec![
            pair(1, Some(11)),
            pair(2, Some(22)),
            pair(3, Some(33)),
            pair(4, None),
        ];
        assert_eq!(traits_hash(&pairs, &traits), "11");
    }

    #[test]
    fn differing_only_in_excluded_trait_hash_equal() {
        let mut excluded = trait_(2, 1);
        excluded.exclude_from_duplicate_detection = true;
        let traits = vec![trait_(1, 0), excluded];

        let a = vec![pair(1, Some(5)), pair(2, Some(6))];
        let b = vec![pair(1, Some(5)), pair(2, Some(7))];
        assert_eq!(traits_hash(&a, &traits), traits_hash(&b, &traits));
    }

    #[test]
    fn no_separator_between_ids() {
        let traits = vec![trait_(1, 0), trait_(2, 1)];
        // Documented collision: "1","23" and "12","3" both give "123".
        let a = vec![pair(1, Some(1)), pair(2, Some(23))];
        let b = vec![pair(1, Some(12)), pair(2, Some(3))];
        assert_eq!(traits_hash(&a, &traits), "123");
        assert_eq!(traits_hash(&a, &traits), traits_hash(&b, &traits));
    }

    #[test]
    fn empty_selection_gives_empty_hash() {
        assert_eq!(traits_hash(&[], &[trait_(1, 0)]), "");
    }
}
