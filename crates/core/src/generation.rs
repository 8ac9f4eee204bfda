//! Generation batch constants, job validation, item selection and the
//! consecutive-failure budget.

use rand::Rng;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::catalog::{Conflict, ImageLayer, RunScope, Trait, TraitValuePair};
use crate::conflict;
use crate::error::CoreError;
use crate::hashing;
use crate::pool::ValuePool;
use crate::rarity;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Retry budgets
// ---------------------------------------------------------------------------

/// Full selection + conflict-resolution cycles tried per item before the
/// index is given up.
pub const MAX_UNIQUENESS_ATTEMPTS: u32 = 20;

/// Consecutive failed items after which the rest of the batch is abandoned.
pub const MAX_CONSECUTIVE_FAILURES: u32 = 10;

/// Upper bound on items per batch invocation.
pub const MAX_BATCH_SIZE: i32 = 10_000;

// ---------------------------------------------------------------------------
// Job
// ---------------------------------------------------------------------------

/// Parameters of one batch invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct GenerationJob {
    pub project_id: DbId,
    pub collection_id: DbId,
    pub composite_group_id: DbId,
    /// `None` when the collection has no trait sets.
    pub trait_set_id: Option<DbId>,
    #[validate(range(min = 0))]
    pub start_index: i32,
    #[validate(range(min = 1, max = 10000))]
    pub batch_size: i32,
    /// Pre-stage all artwork before generating.
    pub first_batch_for_trait_set: bool,
}

impl GenerationJob {
    pub fn scope(&self) -> RunScope {
        RunScope {
            project_id: self.project_id,
            collection_id: self.collection_id,
            composite_group_id: self.composite_group_id,
        }
    }

    /// Validate field ranges, mapping failures to [`CoreError::Validation`].
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))
    }
}

/// Exclusive end index of a batch, clamped to the collection supply.
pub fn batch_end(start_index: i32, batch_size: i32, supply: i32) -> i32 {
    start_index.saturating_add(batch_size).min(supply)
}

/// Whether a batch ending at `end_index` completes the collection.
pub fn is_final_batch(end_index: i32, supply: i32) -> bool {
    end_index == supply
}

/// Hash assigned to a prerendered item: its index as a string.
pub fn prerendered_hash(item_index: i32) -> String {
    item_index.to_string()
}

// ---------------------------------------------------------------------------
// Catalog validation
// ---------------------------------------------------------------------------

/// Reject a generative catalog that cannot produce anything.
pub fn validate_catalog(
    traits: &[Trait],
    pool: &ValuePool,
    layers: &[ImageLayer],
) -> Result<(), CoreError> {
    if traits.is_empty() {
        return Err(CoreError::Validation(
            "No traits configured for this collection".to_string(),
        ));
    }
    if pool.is_empty() {
        return Err(CoreError::Validation(
            "No trait values configured for this collection".to_string(),
        ));
    }
    if layers.is_empty() {
        return Err(CoreError::Validation(
            "No image layers configured for this collection".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Item selection
// ---------------------------------------------------------------------------

/// Why a single selection attempt produced nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionFailure {
    /// An always-unique trait has no values left.
    PoolExhausted { trait_id: DbId },
}

/// A candidate item: post-conflict selections plus their hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub pairs: Vec<TraitValuePair>,
    pub traits_hash: String,
}

/// Draw one value per trait, in catalog order.
///
/// A non-unique trait whose draw under-covers simply gets a null value. An
/// always-unique trait with an empty pool fails the attempt.
pub fn select_pairs<R: Rng + ?Sized>(
    traits: &[Trait],
    pool: &ValuePool,
    rng: &mut R,
) -> Result<Vec<TraitValuePair>, SelectionFailure> {
    traits
        .iter()
        .map(|t| {
            let values = pool.values(t.id);
            if t.is_always_unique && values.is_empty() {
                return Err(SelectionFailure::PoolExhausted { trait_id: t.id });
            }
            Ok(TraitValuePair {
                trait_id: t.id,
                trait_value_id: rarity::pick(values, t.is_always_unique, None, rng).map(|v| v.id),
            })
        })
        .collect()
}

/// One full attempt: select, resolve conflicts, hash.
pub fn draw_candidate<R: Rng + ?Sized>(
    traits: &[Trait],
    conflicts: &[Conflict],
    pool: &ValuePool,
    rng: &mut R,
) -> Result<Candidate, SelectionFailure> {
    let selected = select_pairs(traits, pool, rng)?;
    let pairs = conflict::resolve(selected, conflicts, traits, pool, rng);
    let traits_hash = hashing::traits_hash(&pairs, traits);
    Ok(Candidate { pairs, traits_hash })
}

// ---------------------------------------------------------------------------
// Failure budget
// ---------------------------------------------------------------------------

/// Tracks consecutive item failures within a batch.
#[derive(Debug, Clone, Default)]
pub struct FailureBudget {
    consecutive: u32,
    failed_indices: Vec<i32>,
}

impl FailureBudget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failed item. Returns `true` when the batch must stop.
    pub fn record_failure(&mut self, item_index: i32) -> bool {
        self.consecutive += 1;
        self.failed_indices.push(item_index);
        self.consecutive >= MAX_CONSECUTIVE_FAILURES
    }

    pub fn record_success(&mut self) {
        self.consecutive = 0;
    }

    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }

    pub fn into_failed_indices(self) -> Vec<i32> {
        self.failed_indices
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
