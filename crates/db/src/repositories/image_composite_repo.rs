//! Repository for the `image_composites` table.

use nftgen_core::catalog::{NewComposite, RunScope};
use nftgen_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::image_composite::ImageComposite;

const COLUMNS: &str = "id, project_id, collection_id, composite_group_id, item_index, \
    external_url, traits, traits_hash, created_at";

/// Provides persistence for generated composites.
pub struct ImageCompositeRepo;

impl ImageCompositeRepo {
    /// Insert one generated item into the run's group.
    pub async fn create(
        pool: &PgPool,
        scope: &RunScope,
        input: &NewComposite,
    ) -> Result<ImageComposite, sqlx::Error> {
        let query = format!(
            "INSERT INTO image_composites (project_id, collection_id, composite_group_id,
                item_index, external_url, traits, traits_hash)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ImageComposite>(&query)
            .bind(scope.project_id)
            .bind(scope.collection_id)
            .bind(scope.composite_group_id)
            .bind(input.item_index)
            .bind(&input.external_url)
            .bind(Json(&input.traits))
            .bind(&input.traits_hash)
            .fetch_one(pool)
            .await
    }

    /// Whether the group already holds an item with this hash.
    pub async fn exists_with_hash(
        pool: &PgPool,
        scope: &RunScope,
        traits_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM image_composites
                WHERE project_id = $1 AND collection_id = $2
                  AND composite_group_id = $3 AND traits_hash = $4)",
        )
        .bind(scope.project_id)
        .bind(scope.collection_id)
        .bind(scope.composite_group_id)
        .bind(traits_hash)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Distinct values of `trait_id` already used by the group's items.
    pub async fn used_value_ids(
        pool: &PgPool,
        scope: &RunScope,
        trait_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT DISTINCT (elem->>'trait_value_id')::BIGINT
             FROM image_composites c, jsonb_array_elements(c.traits) elem
             WHERE c.project_id = $1 AND c.collection_id = $2 AND c.composite_group_id = $3
               AND (elem->>'trait_id')::BIGINT = $4
               AND elem->>'trait_value_id' IS NOT NULL",
        )
        .bind(scope.project_id)
        .bind(scope.collection_id)
        .bind(scope.composite_group_id)
        .bind(trait_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// All items of a group ordered by item index.
    pub async fn list_by_group(
        pool: &PgPool,
        composite_group_id: DbId,
    ) -> Result<Vec<ImageComposite>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM image_composites
             WHERE composite_group_id = $1
             ORDER BY item_index, id"
        );
        sqlx::query_as::<_, ImageComposite>(&query)
            .bind(composite_group_id)
            .fetch_all(pool)
            .await
    }
}
