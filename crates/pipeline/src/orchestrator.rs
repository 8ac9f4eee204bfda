//! Batch driver: load the catalog, stage artwork, then generate, render,
//! upload and persist items one index at a time.
//!
//! Each item is persisted before the next one is selected, so the
//! duplicate check always sees every earlier item of the batch.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use futures::future::join_all;
use nftgen_cloud::BlobStore;
use nftgen_core::catalog::{
    CollectionType, Conflict, ImageComposite, ImageLayer, NewComposite, RunScope, Trait,
    TraitValue,
};
use nftgen_core::error::CoreError;
use nftgen_core::generation::{
    self, Candidate, FailureBudget, GenerationJob, SelectionFailure, MAX_UNIQUENESS_ATTEMPTS,
};
use nftgen_core::group;
use nftgen_core::layering;
use nftgen_core::pool::ValuePool;
use nftgen_core::rarity;
use nftgen_core::types::DbId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::catalog::CatalogReader;
use crate::compositor;
use crate::error::PipelineError;
use crate::staging::{composite_key, Staging};
use crate::store::CompositeStore;

/// Shared dependencies of a generation run.
#[derive(Clone)]
pub struct GenerationContext {
    pub catalog: Arc<dyn CatalogReader>,
    pub store: Arc<dyn CompositeStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub scratch_root: PathBuf,
}

/// Result of one batch invocation.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Items persisted by this batch, in index order.
    pub composites: Vec<ImageComposite>,
    /// Indices that produced no item.
    pub failed_indices: Vec<i32>,
    /// Set when the consecutive-failure limit stopped the batch early.
    pub aborted: bool,
}

/// Catalog slice a generative batch works from.
struct GenerativeCatalog {
    traits: Vec<Trait>,
    conflicts: Vec<Conflict>,
    layers: Vec<ImageLayer>,
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Run one batch with an OS-seeded generator.
pub async fn run_batch(
    ctx: &GenerationContext,
    job: &GenerationJob,
) -> Result<BatchOutcome, PipelineError> {
    let mut rng = StdRng::from_os_rng();
    run_batch_with_rng(ctx, job, &mut rng).await
}

/// Run one batch drawing from `rng`.
///
/// Misconfigured catalogs (no traits, values or layers) yield an empty
/// outcome and no writes. Failed indices are skipped; ten failures in a row
/// abandon the rest of the batch.
pub async fn run_batch_with_rng<R: Rng + Send>(
    ctx: &GenerationContext,
    job: &GenerationJob,
    rng: &mut R,
) -> Result<BatchOutcome, PipelineError> {
    job.check()?;
    let scope = job.scope();

    let collection = ctx
        .catalog
        .collection(job.project_id, job.collection_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "collection",
            id: job.collection_id,
        })?;

    if let Some(trait_set_id) = job.trait_set_id {
        let trait_set = ctx
            .catalog
            .trait_set(collection.id, trait_set_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "trait_set",
                id: trait_set_id,
            })?;
        tracing::debug!(trait_set_id, name = %trait_set.name, supply = trait_set.supply, "Generating for trait set");
    }

    let end = generation::batch_end(job.start_index, job.batch_size, collection.supply);
    let staging = Staging::new(&ctx.scratch_root, &scope);

    tracing::info!(
        project_id = scope.project_id,
        collection_id = scope.collection_id,
        composite_group_id = scope.composite_group_id,
        collection_type = collection.collection_type.name(),
        start_index = job.start_index,
        end_index = end,
        "Starting generation batch",
    );

    let outcome = match collection.collection_type {
        CollectionType::Generative => {
            let Some(catalog) = load_generative(ctx, job, &scope).await? else {
                return Ok(BatchOutcome::default());
            };
            let mut pool = load_value_pool(ctx, &scope, &catalog.traits).await?;
            if let Err(e) = generation::validate_catalog(&catalog.traits, &pool, &catalog.layers) {
                tracing::warn!(collection_id = scope.collection_id, error = %e, "Catalog cannot generate");
                return Ok(BatchOutcome::default());
            }
            log_catalog_warnings(&catalog, &pool);

            stage(ctx, job, &staging, &catalog.layers).await?;
            generate_items(ctx, job, &scope, &staging, &catalog, &mut pool, end, rng).await
        }
        CollectionType::Prerendered => {
            let layers = scoped_layers(
                ctx.catalog.image_layers(job.collection_id).await?,
                job.trait_set_id,
            );
            if layers.is_empty() {
                tracing::warn!(collection_id = scope.collection_id, "No prerendered images uploaded");
                return Ok(BatchOutcome::default());
            }
            stage(ctx, job, &staging, &layers).await?;
            pass_through_items(ctx, job, &scope, &staging, &layers, end).await
        }
    };

    if generation::is_final_batch(end, collection.supply) {
        staging.cleanup().await;
    }

    tracing::info!(
        composite_group_id = scope.composite_group_id,
        created = outcome.composites.len(),
        failed = outcome.failed_indices.len(),
        aborted = outcome.aborted,
        "Generation batch finished",
    );
    Ok(outcome)
}

/// Persist a fresh display order for a group's `supply` items.
pub async fn shuffle_group<R: Rng + Send>(
    store: &dyn CompositeStore,
    composite_group_id: DbId,
    supply: i32,
    rng: &mut R,
) -> Result<Vec<i32>, PipelineError> {
    let order = group::shuffled_order(supply, rng);
    if !store.set_shuffled_order(composite_group_id, &order).await? {
        return Err(CoreError::NotFound {
            entity: "composite_group",
            id: composite_group_id,
        }
        .into());
    }
    tracing::info!(composite_group_id, supply, "Shuffled composite group");
    Ok(order)
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Layers usable by a run: unscoped ones plus those of its trait set.
fn scoped_layers(layers: Vec<ImageLayer>, trait_set_id: Option<DbId>) -> Vec<ImageLayer> {
    layers
        .into_iter()
        .filter(|l| l.trait_set_id.is_none() || l.trait_set_id == trait_set_id)
        .collect()
}

async fn load_generative(
    ctx: &GenerationContext,
    job: &GenerationJob,
    scope: &RunScope,
) -> Result<Option<GenerativeCatalog>, PipelineError> {
    let traits = ctx.catalog.traits(job.collection_id, job.trait_set_id).await?;
    if traits.is_empty() {
        tracing::warn!(collection_id = scope.collection_id, "No traits configured");
        return Ok(None);
    }
    let layers = scoped_layers(
        ctx.catalog.image_layers(job.collection_id).await?,
        job.trait_set_id,
    );
    let conflicts = ctx
        .catalog
        .conflicts(job.collection_id, job.trait_set_id)
        .await?;
    Ok(Some(GenerativeCatalog {
        traits,
        conflicts,
        layers,
    }))
}

/// Fetch every trait's values concurrently. Always-unique traits leave out
/// values already used in the run's group.
async fn load_value_pool(
    ctx: &GenerationContext,
    scope: &RunScope,
    traits: &[Trait],
) -> Result<ValuePool, PipelineError> {
    let fetched = join_all(traits.iter().map(|t| load_values(ctx, scope, t))).await;

    let mut pool = ValuePool::new();
    for (t, values) in traits.iter().zip(fetched) {
        pool.insert(t.id, values?);
    }
    Ok(pool)
}

async fn load_values(
    ctx: &GenerationContext,
    scope: &RunScope,
    t: &Trait,
) -> Result<Vec<TraitValue>, PipelineError> {
    let exclude = if t.is_always_unique {
        ctx.store.used_value_ids(scope, t.id).await?
    } else {
        Vec::new()
    };
    ctx.catalog.trait_values(t.id, &exclude).await
}

fn log_catalog_warnings(catalog: &GenerativeCatalog, pool: &ValuePool) {
    for t in &catalog.traits {
        let values = pool.values(t.id);
        if t.is_always_unique || values.is_empty() {
            continue;
        }
        let sum = rarity::rarity_sum(values);
        if !rarity::is_rarity_sum_balanced(sum) {
            tracing::warn!(trait_id = t.id, trait_name = %t.name, sum, "Trait rarities do not sum to 1");
        }
    }
    for (layer_id, companion_id) in layering::missing_companions(&catalog.layers) {
        tracing::warn!(layer_id, companion_id, "Companion layer not found; skipping");
    }
}

async fn stage(
    ctx: &GenerationContext,
    job: &GenerationJob,
    staging: &Staging,
    layers: &[ImageLayer],
) -> Result<(), PipelineError> {
    if job.start_index == 0 {
        staging.prepare().await?;
    }
    if job.first_batch_for_trait_set {
        staging.prefetch(ctx.blobs.as_ref(), layers).await;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Generative items
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
async fn generate_items<R: Rng + Send>(
    ctx: &GenerationContext,
    job: &GenerationJob,
    scope: &RunScope,
    staging: &Staging,
    catalog: &GenerativeCatalog,
    pool: &mut ValuePool,
    end: i32,
    rng: &mut R,
) -> BatchOutcome {
    let mut budget = FailureBudget::new();
    let mut batch_hashes = HashSet::new();
    let mut outcome = BatchOutcome::default();

    for item_index in job.start_index..end {
        let result = generate_item(
            ctx,
            job.trait_set_id,
            scope,
            staging,
            catalog,
            pool,
            &batch_hashes,
            item_index,
            rng,
        )
        .await;

        match result {
            Ok(Some(composite)) => {
                budget.record_success();
                pool.consume_always_unique(&catalog.traits, &composite.traits);
                batch_hashes.insert(composite.traits_hash.clone());
                outcome.composites.push(composite);
            }
            Ok(None) => {
                tracing::warn!(item_index, "No unique combination found; skipping index");
                if budget.record_failure(item_index) {
                    outcome.aborted = true;
                    break;
                }
            }
            Err(e) => {
                tracing::error!(item_index, error = %e, "Failed to produce item");
                if budget.record_failure(item_index) {
                    outcome.aborted = true;
                    break;
                }
            }
        }
    }

    if outcome.aborted {
        tracing::error!(
            composite_group_id = scope.composite_group_id,
            consecutive = budget.consecutive(),
            "Too many consecutive failures; abandoning batch",
        );
    }
    outcome.failed_indices = budget.into_failed_indices();
    outcome
}

/// Produce, render, upload and persist one item.
///
/// `Ok(None)` means no unique combination could be drawn.
#[allow(clippy::too_many_arguments)]
async fn generate_item<R: Rng + Send>(
    ctx: &GenerationContext,
    trait_set_id: Option<DbId>,
    scope: &RunScope,
    staging: &Staging,
    catalog: &GenerativeCatalog,
    pool: &ValuePool,
    batch_hashes: &HashSet<String>,
    item_index: i32,
    rng: &mut R,
) -> Result<Option<ImageComposite>, PipelineError> {
    let Some(candidate) =
        find_unique_candidate(ctx, scope, catalog, pool, batch_hashes, item_index, rng).await?
    else {
        return Ok(None);
    };

    let traits = layering::resolve_composite_traits(
        &candidate.pairs,
        &catalog.traits,
        &catalog.layers,
        trait_set_id,
    );
    let render_list = layering::build_render_list(&traits, &catalog.traits, &catalog.layers);

    let mut paths = Vec::with_capacity(render_list.len());
    for entry in &render_list {
        paths.push(staging.ensure_layer(ctx.blobs.as_ref(), entry.layer).await?);
    }

    let external_url = render_and_upload(ctx, scope, staging, &paths, item_index).await?;

    let composite = ctx
        .store
        .create_composite(
            scope,
            &NewComposite {
                item_index,
                external_url,
                traits,
                traits_hash: candidate.traits_hash,
            },
        )
        .await?;
    tracing::debug!(item_index, traits_hash = %composite.traits_hash, "Persisted composite");
    Ok(Some(composite))
}

/// Draw up to [`MAX_UNIQUENESS_ATTEMPTS`] candidates until one is new to
/// both this batch and the stored group.
async fn find_unique_candidate<R: Rng + Send>(
    ctx: &GenerationContext,
    scope: &RunScope,
    catalog: &GenerativeCatalog,
    pool: &ValuePool,
    batch_hashes: &HashSet<String>,
    item_index: i32,
    rng: &mut R,
) -> Result<Option<Candidate>, PipelineError> {
    for attempt in 1..=MAX_UNIQUENESS_ATTEMPTS {
        let candidate =
            match generation::draw_candidate(&catalog.traits, &catalog.conflicts, pool, rng) {
                Ok(candidate) => candidate,
                Err(SelectionFailure::PoolExhausted { trait_id }) => {
                    tracing::warn!(item_index, trait_id, "Always-unique trait has no values left");
                    return Ok(None);
                }
            };

        if batch_hashes.contains(&candidate.traits_hash)
            || ctx.store.exists_with_hash(scope, &candidate.traits_hash).await?
        {
            tracing::trace!(item_index, attempt, traits_hash = %candidate.traits_hash, "Duplicate combination");
            continue;
        }
        return Ok(Some(candidate));
    }
    Ok(None)
}

async fn render_and_upload(
    ctx: &GenerationContext,
    scope: &RunScope,
    staging: &Staging,
    paths: &[PathBuf],
    item_index: i32,
) -> Result<String, PipelineError> {
    let output = staging.output_path(item_index);
    if !compositor::render(paths, &output).await? {
        return Err(CoreError::Validation(format!("Item {item_index} has no artwork layers")).into());
    }
    let url = ctx
        .blobs
        .upload(&output, &composite_key(scope, item_index))
        .await?;
    Ok(url)
}

// ---------------------------------------------------------------------------
// Prerendered items
// ---------------------------------------------------------------------------

async fn pass_through_items(
    ctx: &GenerationContext,
    job: &GenerationJob,
    scope: &RunScope,
    staging: &Staging,
    layers: &[ImageLayer],
    end: i32,
) -> BatchOutcome {
    let mut budget = FailureBudget::new();
    let mut outcome = BatchOutcome::default();

    for item_index in job.start_index..end {
        match pass_through_item(ctx, scope, staging, layers, item_index).await {
            Ok(composite) => {
                budget.record_success();
                outcome.composites.push(composite);
            }
            Err(e) => {
                tracing::error!(item_index, error = %e, "Failed to copy prerendered item");
                if budget.record_failure(item_index) {
                    outcome.aborted = true;
                    break;
                }
            }
        }
    }

    outcome.failed_indices = budget.into_failed_indices();
    outcome
}

/// Item `i` is the `i`-th uploaded image, re-encoded as PNG.
async fn pass_through_item(
    ctx: &GenerationContext,
    scope: &RunScope,
    staging: &Staging,
    layers: &[ImageLayer],
    item_index: i32,
) -> Result<ImageComposite, PipelineError> {
    let layer = usize::try_from(item_index)
        .ok()
        .and_then(|i| layers.get(i))
        .ok_or_else(|| {
            CoreError::Validation(format!("No prerendered image for item {item_index}"))
        })?;

    let source = staging.ensure_layer(ctx.blobs.as_ref(), layer).await?;
    let external_url = render_and_upload(ctx, scope, staging, &[source], item_index).await?;

    let composite = ctx
        .store
        .create_composite(
            scope,
            &NewComposite {
                item_index,
                external_url,
                traits: Vec::new(),
                traits_hash: generation::prerendered_hash(item_index),
            },
        )
        .await?;
    Ok(composite)
}
