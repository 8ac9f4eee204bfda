//! Command runners. Each opens what it needs and logs a summary.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use nftgen_cloud::{BlobStore, LocalBlobStore, S3BlobStore};
use nftgen_core::error::CoreError;
use nftgen_core::generation::GenerationJob;
use nftgen_core::types::DbId;
use nftgen_db::DbPool;
use nftgen_pipeline::export::export_metadata;
use nftgen_pipeline::pg::{PgCatalog, PgCompositeStore};
use nftgen_pipeline::{run_batch, shuffle_group, CatalogReader, GenerationContext};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cli::{Cli, Commands};
use crate::config::{StorageConfig, WorkerConfig};

pub async fn run(cli: Cli, config: WorkerConfig) -> anyhow::Result<()> {
    let pool = nftgen_db::create_pool(&config.database_url, config.db_max_connections)
        .await
        .context("Failed to connect to database")?;
    nftgen_db::health_check(&pool)
        .await
        .context("Database health check failed")?;

    match cli.command {
        Commands::Generate(args) => generate(&pool, &config, &args.job()).await,
        Commands::Shuffle {
            project_id,
            collection_id,
            composite_group_id,
        } => shuffle(&pool, project_id, collection_id, composite_group_id).await,
        Commands::ExportMetadata {
            project_id,
            collection_id,
            composite_group_id,
            trait_set_id,
            out_dir,
        } => {
            export(&pool, project_id, collection_id, composite_group_id, trait_set_id.0, &out_dir)
                .await
        }
        Commands::Migrate => {
            nftgen_db::run_migrations(&pool)
                .await
                .context("Failed to apply migrations")?;
            tracing::info!("Migrations applied");
            Ok(())
        }
    }
}

pub async fn build_blob_store(storage: &StorageConfig) -> anyhow::Result<Arc<dyn BlobStore>> {
    Ok(match storage {
        StorageConfig::Local {
            base_path,
            public_url,
        } => Arc::new(LocalBlobStore::new(base_path.clone(), public_url.clone())),
        StorageConfig::S3 { bucket, public_url } => {
            Arc::new(S3BlobStore::from_env(bucket.clone(), public_url.clone()).await?)
        }
    })
}

async fn generate(pool: &DbPool, config: &WorkerConfig, job: &GenerationJob) -> anyhow::Result<()> {
    let ctx = GenerationContext {
        catalog: Arc::new(PgCatalog::new(pool.clone())),
        store: Arc::new(PgCompositeStore::new(pool.clone())),
        blobs: build_blob_store(&config.storage).await?,
        scratch_root: config.scratch_dir.clone(),
    };

    let outcome = run_batch(&ctx, job).await?;
    tracing::info!(
        composite_group_id = job.composite_group_id,
        start_index = job.start_index,
        created = outcome.composites.len(),
        failed = ?outcome.failed_indices,
        aborted = outcome.aborted,
        "Batch complete",
    );
    Ok(())
}

async fn shuffle(
    pool: &DbPool,
    project_id: DbId,
    collection_id: DbId,
    composite_group_id: DbId,
) -> anyhow::Result<()> {
    let collection = PgCatalog::new(pool.clone())
        .collection(project_id, collection_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "collection",
            id: collection_id,
        })?;

    let store = PgCompositeStore::new(pool.clone());
    let mut rng = StdRng::from_os_rng();
    shuffle_group(&store, composite_group_id, collection.supply, &mut rng).await?;
    Ok(())
}

async fn export(
    pool: &DbPool,
    project_id: DbId,
    collection_id: DbId,
    composite_group_id: DbId,
    trait_set_id: Option<DbId>,
    out_dir: &Path,
) -> anyhow::Result<()> {
    let catalog = PgCatalog::new(pool.clone());
    let store = PgCompositeStore::new(pool.clone());
    export_metadata(
        &catalog,
        &store,
        project_id,
        collection_id,
        composite_group_id,
        trait_set_id,
        out_dir,
    )
    .await?;
    Ok(())
}
