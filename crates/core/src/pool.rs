//! Per-trait value pools for one batch.
//!
//! The pool is owned by the batch loop and passed by reference; always-unique
//! values are removed from it as items consume them.

use std::collections::HashMap;

use crate::catalog::{CompositeTrait, Trait, TraitValue};
use crate::types::DbId;

#[derive(Debug, Clone, Default)]
pub struct ValuePool {
    values: HashMap<DbId, Vec<TraitValue>>,
}

impl ValuePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the candidate values for `trait_id`.
    pub fn insert(&mut self, trait_id: DbId, values: Vec<TraitValue>) {
        self.values.insert(trait_id, values);
    }

    /// Candidate values for `trait_id`, in catalog order.
    pub fn values(&self, trait_id: DbId) -> &[TraitValue] {
        self.values.get(&trait_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Remove a consumed value. Returns `true` if it was present.
    ///
    /// Order of the remaining values is preserved so that the rarity scan
    /// stays stable.
    pub fn remove_value(&mut self, trait_id: DbId, value_id: DbId) -> bool {
        let Some(values) = self.values.get_mut(&trait_id) else {
            return false;
        };
        match values.iter().position(|v| v.id == value_id) {
            Some(idx) => {
                values.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Remove every always-unique value used by a persisted item.
    ///
    /// Returns how many values were removed.
    pub fn consume_always_unique(&mut self, traits: &[Trait], used: &[CompositeTrait]) -> usize {
        let mut removed = 0;
        for ct in used {
            let Some(value_id) = ct.trait_value_id else {
                continue;
            };
            let always_unique = traits
                .iter()
                .any(|t| t.id == ct.trait_id && t.is_always_unique);
            if always_unique && self.remove_value(ct.trait_id, value_id) {
                removed += 1;
            }
        }
        removed
    }

    /// Total number of candidate values across all traits.
    pub fn total_values(&self) -> usize {
        self.values.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_values() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(id: DbId, trait_id: DbId) -> TraitValue {
        TraitValue {
            id,
            trait_id,
            name: format!("v{id}"),
            rarity: 0.5,
        }
    }

    fn trait_(id: DbId, always_unique: bool) -> Trait {
        Trait {
            id,
            name: format!("t{id}"),
            z_index: id as i32,
            is_metadata_only: false,
            is_artwork_only: false,
            is_always_unique: always_unique,
            exclude_from_duplicate_detection: false,
        }
    }

    #[test]
    fn unknown_trait_has_no_values() {
        let pool = ValuePool::new();
        assert!(pool.values(9).is_empty());
        assert!(pool.is_empty());
    }

    #[test]
    fn remove_preserves_order() {
        let mut pool = ValuePool::new();
        pool.insert(1, vec![value(10, 1), value(11, 1), value(12, 1)]);
        assert!(pool.remove_value(1, 11));
        let ids: Vec<_> = pool.values(1).iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![10, 12]);
        assert!(!pool.remove_value(1, 11));
        assert!(!pool.remove_value(2, 10));
    }

    #[test]
    fn consume_only_touches_always_unique_traits() {
        let traits = vec![trait_(1, true), trait_(2, false)];
        let mut pool = ValuePool::new();
        pool.insert(1, vec![value(10, 1), value(11, 1)]);
        pool.insert(2, vec![value(20, 2)]);

        let used = vec![
            CompositeTrait {
                trait_id: 1,
                trait_value_id: Some(10),
                image_layer_id: None,
            },
            CompositeTrait {
                trait_id: 2,
                trait_value_id: Some(20),
                image_layer_id: None,
            },
        ];

        assert_eq!(pool.consume_always_unique(&traits, &used), 1);
        assert_eq!(pool.values(1).len(), 1);
        assert_eq!(pool.values(2).len(), 1);
        assert_eq!(pool.total_values(), 2);
    }
}
