//! Repository for the `conflicts` table.

use nftgen_core::types::DbId;
use sqlx::PgPool;

use crate::models::conflict::{Conflict, CreateConflict};

const COLUMNS: &str = "id, collection_id, trait1_id, trait1_value_id, trait2_id, \
    trait2_value_id, resolution_type, trait_set_id, created_at, updated_at";

/// Provides CRUD operations for conflict rules.
pub struct ConflictRepo;

impl ConflictRepo {
    pub async fn create(pool: &PgPool, input: &CreateConflict) -> Result<Conflict, sqlx::Error> {
        let query = format!(
            "INSERT INTO conflicts (collection_id, trait1_id, trait1_value_id, trait2_id,
                trait2_value_id, resolution_type, trait_set_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Conflict>(&query)
            .bind(input.collection_id)
            .bind(input.trait1_id)
            .bind(input.trait1_value_id)
            .bind(input.trait2_id)
            .bind(input.trait2_value_id)
            .bind(input.resolution_type.name())
            .bind(input.trait_set_id)
            .fetch_one(pool)
            .await
    }

    /// Rules that apply to a run, in the order they were created.
    ///
    /// Collection-wide rules always apply; set-scoped rules only when
    /// `trait_set_id` matches.
    pub async fn list_for_generation(
        pool: &PgPool,
        collection_id: DbId,
        trait_set_id: Option<DbId>,
    ) -> Result<Vec<Conflict>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM conflicts
             WHERE collection_id = $1
               AND (trait_set_id IS NULL OR trait_set_id = $2)
             ORDER BY id"
        );
        sqlx::query_as::<_, Conflict>(&query)
            .bind(collection_id)
            .bind(trait_set_id)
            .fetch_all(pool)
            .await
    }
}
