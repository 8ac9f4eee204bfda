//! Repository for the `traits` table.

use nftgen_core::types::DbId;
use sqlx::PgPool;

use crate::models::trait_::{CreateTrait, Trait};

const COLUMNS: &str = "t.id, t.collection_id, t.name, t.z_index, t.is_metadata_only, \
    t.is_artwork_only, t.is_always_unique, t.exclude_from_duplicate_detection, \
    t.created_at, t.updated_at";

/// Provides CRUD operations for traits.
pub struct TraitRepo;

impl TraitRepo {
    /// Insert a new trait, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTrait) -> Result<Trait, sqlx::Error> {
        let query = format!(
            "INSERT INTO traits AS t (collection_id, name, z_index, is_metadata_only,
                is_artwork_only, is_always_unique, exclude_from_duplicate_detection)
             VALUES ($1, $2, $3, COALESCE($4, false), COALESCE($5, false),
                COALESCE($6, false), COALESCE($7, false))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Trait>(&query)
            .bind(input.collection_id)
            .bind(&input.name)
            .bind(input.z_index)
            .bind(input.is_metadata_only)
            .bind(input.is_artwork_only)
            .bind(input.is_always_unique)
            .bind(input.exclude_from_duplicate_detection)
            .fetch_one(pool)
            .await
    }

    /// List a collection's traits, in layering order.
    ///
    /// With a trait set, only traits linked to that set are returned.
    pub async fn list_for_generation(
        pool: &PgPool,
        collection_id: DbId,
        trait_set_id: Option<DbId>,
    ) -> Result<Vec<Trait>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM traits t
             WHERE t.collection_id = $1
               AND ($2::BIGINT IS NULL OR EXISTS (
                    SELECT 1 FROM trait_set_traits s
                    WHERE s.trait_id = t.id AND s.trait_set_id = $2))
             ORDER BY t.z_index, t.id"
        );
        sqlx::query_as::<_, Trait>(&query)
            .bind(collection_id)
            .bind(trait_set_id)
            .fetch_all(pool)
            .await
    }
}
