//! Repository for the `trait_sets` table and its `trait_set_traits` links.

use nftgen_core::types::DbId;
use sqlx::PgPool;

use crate::models::trait_set::{CreateTraitSet, TraitSet};

const COLUMNS: &str = "id, collection_id, name, supply, created_at, updated_at";

/// Provides CRUD operations for trait sets.
pub struct TraitSetRepo;

impl TraitSetRepo {
    pub async fn create(pool: &PgPool, input: &CreateTraitSet) -> Result<TraitSet, sqlx::Error> {
        let query = format!(
            "INSERT INTO trait_sets (collection_id, name, supply)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TraitSet>(&query)
            .bind(input.collection_id)
            .bind(&input.name)
            .bind(input.supply)
            .fetch_one(pool)
            .await
    }

    /// Find a trait set by ID within its collection.
    pub async fn find(
        pool: &PgPool,
        collection_id: DbId,
        id: DbId,
    ) -> Result<Option<TraitSet>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM trait_sets WHERE id = $1 AND collection_id = $2");
        sqlx::query_as::<_, TraitSet>(&query)
            .bind(id)
            .bind(collection_id)
            .fetch_optional(pool)
            .await
    }

    /// Add a trait to a trait set. Adding an existing member is a no-op.
    pub async fn add_trait(
        pool: &PgPool,
        trait_set_id: DbId,
        trait_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO trait_set_traits (trait_set_id, trait_id)
             VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(trait_set_id)
        .bind(trait_id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
