//! Repository for the `image_layers` table.

use nftgen_core::types::DbId;
use sqlx::PgPool;

use crate::models::image_layer::{CreateImageLayer, ImageLayer};

const COLUMNS: &str = "id, collection_id, path, bytes, trait_id, trait_value_id, \
    companion_layer_id, companion_layer_z_index, trait_set_id, created_at, updated_at";

/// Provides CRUD operations for image layers.
pub struct ImageLayerRepo;

impl ImageLayerRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateImageLayer,
    ) -> Result<ImageLayer, sqlx::Error> {
        let query = format!(
            "INSERT INTO image_layers (collection_id, path, bytes, trait_id, trait_value_id,
                companion_layer_id, companion_layer_z_index, trait_set_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ImageLayer>(&query)
            .bind(input.collection_id)
            .bind(&input.path)
            .bind(input.bytes)
            .bind(input.trait_id)
            .bind(input.trait_value_id)
            .bind(input.companion_layer_id)
            .bind(input.companion_layer_z_index)
            .bind(input.trait_set_id)
            .fetch_one(pool)
            .await
    }

    /// List every layer of a collection ordered by ID.
    ///
    /// Layers scoped to any trait set are included; scope selection happens
    /// in the generator.
    pub async fn list_by_collection(
        pool: &PgPool,
        collection_id: DbId,
    ) -> Result<Vec<ImageLayer>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM image_layers WHERE collection_id = $1 ORDER BY id");
        sqlx::query_as::<_, ImageLayer>(&query)
            .bind(collection_id)
            .fetch_all(pool)
            .await
    }
}
