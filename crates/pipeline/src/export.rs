//! Metadata export: one `<index>.json` document per persisted item.

use std::path::Path;

use futures::future::join_all;
use nftgen_core::error::CoreError;
use nftgen_core::metadata::build_metadata_document;
use nftgen_core::types::DbId;

use crate::catalog::CatalogReader;
use crate::error::PipelineError;
use crate::store::CompositeStore;

/// Write a metadata document for every item of a composite group into
/// `out_dir`. Returns the number of documents written.
pub async fn export_metadata(
    catalog: &dyn CatalogReader,
    store: &dyn CompositeStore,
    project_id: DbId,
    collection_id: DbId,
    composite_group_id: DbId,
    trait_set_id: Option<DbId>,
    out_dir: &Path,
) -> Result<usize, PipelineError> {
    let collection = catalog
        .collection(project_id, collection_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "collection",
            id: collection_id,
        })?;

    let traits = catalog.traits(collection_id, trait_set_id).await?;
    let mut values = Vec::new();
    for fetched in join_all(traits.iter().map(|t| catalog.trait_values(t.id, &[]))).await {
        values.extend(fetched?);
    }

    let composites = store.list_composites(composite_group_id).await?;
    tokio::fs::create_dir_all(out_dir).await?;

    for composite in &composites {
        let document = build_metadata_document(
            &collection,
            composite.item_index,
            &composite.external_url,
            &composite.traits,
            &traits,
            &values,
        );
        let path = out_dir.join(format!("{}.json", composite.item_index));
        tokio::fs::write(&path, serde_json::to_vec_pretty(&document)?).await?;
    }

    tracing::info!(
        composite_group_id,
        documents = composites.len(),
        out_dir = %out_dir.display(),
        "Exported metadata",
    );
    Ok(composites.len())
}
