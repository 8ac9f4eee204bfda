//! Post-hoc shuffling of a composite group's item indices.
//!
//! Export jobs walk the shuffled order so that batches of minted items are
//! not grouped by generation order (and therefore by trait set).

use rand::seq::SliceRandom;
use rand::Rng;

/// Random permutation of `0..supply`.
pub fn shuffled_order<R: Rng + ?Sized>(supply: i32, rng: &mut R) -> Vec<i32> {
    let mut order: Vec<i32> = (0..supply.max(0)).collect();
    order.shuffle(rng);
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn order_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut order = shuffled_order(100, &mut rng);
        assert_eq!(order.len(), 100);
        order.sort_unstable();
        assert_eq!(order, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn order_is_actually_shuffled() {
        let mut rng = StdRng::seed_from_u64(21);
        let order = shuffled_order(100, &mut rng);
        assert_ne!(order, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn non_positive_supply_is_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(shuffled_order(0, &mut rng).is_empty());
        assert!(shuffled_order(-3, &mut rng).is_empty());
    }
}
