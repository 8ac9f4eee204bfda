//! Weighted random selection of a trait value (RarityResolver).
//!
//! Non-unique traits use a linear cumulative-sum scan: draw `r` in `[0, 1)`,
//! walk the values in their given order and return the first one whose
//! running rarity sum reaches `r`. The scan order is part of the contract;
//! rarity accuracy reports compare against it.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::catalog::TraitValue;
use crate::types::DbId;

/// Maximum draws made while trying to avoid an excluded value.
pub const MAX_EXCLUDE_ATTEMPTS: u32 = 10;

/// Pick one value from `values`.
///
/// - `is_always_unique`: uniform choice; `values` must already be reduced to
///   the unused pool by the caller.
/// - otherwise: cumulative rarity scan (see module docs).
///
/// When `exclude_id` is set, a draw that returns the excluded value or no
/// value at all is retried, up to [`MAX_EXCLUDE_ATTEMPTS`] draws. Without it
/// a single draw is made. `None` means no value could be chosen.
pub fn pick<'a, R: Rng + ?Sized>(
    values: &'a [TraitValue],
    is_always_unique: bool,
    exclude_id: Option<DbId>,
    rng: &mut R,
) -> Option<&'a TraitValue> {
    let attempts = if exclude_id.is_some() {
        MAX_EXCLUDE_ATTEMPTS
    } else {
        1
    };

    for _ in 0..attempts {
        match draw_once(values, is_always_unique, rng) {
            Some(value) if Some(value.id) == exclude_id => continue,
            Some(value) => return Some(value),
            None => continue,
        }
    }
    None
}

fn draw_once<'a, R: Rng + ?Sized>(
    values: &'a [TraitValue],
    is_always_unique: bool,
    rng: &mut R,
) -> Option<&'a TraitValue> {
    if is_always_unique {
        return values.choose(rng);
    }

    let r: f64 = rng.random();
    let mut running = 0.0;
    for value in values {
        running += value.rarity;
        if running >= r {
            return Some(value);
        }
    }
    None
}

/// Total rarity weight of a trait's values.
///
/// Generation does not require this to be 1.0; callers use it to flag
/// catalogs whose weights under- or over-cover the draw space.
pub fn rarity_sum(values: &[TraitValue]) -> f64 {
    values.iter().map(|v| v.rarity).sum()
}

/// Whether `sum` is close enough to 1.0 to be considered well-formed.
pub fn is_rarity_sum_balanced(sum: f64) -> bool {
    (sum - 1.0).abs() <= RARITY_SUM_TOLERANCE
}

/// Allowed deviation of a trait's rarity sum from 1.0 before it is reported.
pub const RARITY_SUM_TOLERANCE: f64 = 0.001;
