//! Shuffle and metadata export over a generated group.

mod common;

use assert_matches::assert_matches;
use common::*;
use nftgen_core::catalog::CollectionType;
use nftgen_core::error::CoreError;
use nftgen_core::generation::GenerationJob;
use nftgen_pipeline::export::export_metadata;
use nftgen_pipeline::{run_batch, shuffle_group, PipelineError};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[tokio::test]
async fn test_shuffle_persists_a_permutation() {
    let store = MemoryStore::new();
    let mut rng = StdRng::seed_from_u64(3);

    let order = shuffle_group(&store, GROUP_ID, 25, &mut rng).await.unwrap();
    let mut sorted = order.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, (0..25).collect::<Vec<_>>());
    assert_eq!(store.order(GROUP_ID), Some(order));
}

#[tokio::test]
async fn test_shuffle_unknown_group_is_not_found() {
    let store = MemoryStore::new();
    let mut rng = StdRng::seed_from_u64(3);

    let err = shuffle_group(&store, 999, 5, &mut rng).await.unwrap_err();
    assert_matches!(
        err,
        PipelineError::Core(CoreError::NotFound { entity: "composite_group", id: 999 })
    );
}

#[tokio::test]
async fn test_export_writes_one_document_per_item() {
    let harness = Harness::new();
    let mut catalog = MemoryCatalog::new(CollectionType::Generative, 4);
    catalog.add_trait(1, 0, &[0.4, 0.3, 0.3]);
    catalog.add_trait(2, 1, &[0.4, 0.3, 0.3]);
    catalog.trait_mut(2).is_artwork_only = true;
    harness.upload_artwork(&catalog);
    let ctx = harness.context(catalog.clone());

    let job = GenerationJob {
        project_id: PROJECT_ID,
        collection_id: COLLECTION_ID,
        composite_group_id: GROUP_ID,
        trait_set_id: None,
        start_index: 0,
        batch_size: 4,
        first_batch_for_trait_set: true,
    };
    let outcome = run_batch(&ctx, &job).await.unwrap();
    assert_eq!(outcome.composites.len(), 4);

    let out_dir = harness.dir.path().join("metadata");
    let written = export_metadata(
        &catalog,
        harness.store.as_ref(),
        PROJECT_ID,
        COLLECTION_ID,
        GROUP_ID,
        None,
        &out_dir,
    )
    .await
    .unwrap();
    assert_eq!(written, 4);

    let raw = std::fs::read_to_string(out_dir.join("2.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(doc["name"], "Critters #2");
    assert_eq!(doc["description"], "Test collection");
    let attributes = doc["attributes"].as_array().unwrap();
    assert_eq!(attributes.len(), 1, "artwork-only trait is left out");
    assert_eq!(attributes[0]["trait_type"], "Trait 1");
}
