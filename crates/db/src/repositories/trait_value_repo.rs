//! Repository for the `trait_values` table.

use nftgen_core::types::DbId;
use sqlx::PgPool;

use crate::models::trait_value::{CreateTraitValue, TraitValue};

const COLUMNS: &str = "id, trait_id, name, rarity, created_at, updated_at";

/// Provides CRUD operations for trait values.
pub struct TraitValueRepo;

impl TraitValueRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateTraitValue,
    ) -> Result<TraitValue, sqlx::Error> {
        let query = format!(
            "INSERT INTO trait_values (trait_id, name, rarity)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TraitValue>(&query)
            .bind(input.trait_id)
            .bind(&input.name)
            .bind(input.rarity)
            .fetch_one(pool)
            .await
    }

    /// List a trait's values in catalog order, skipping `exclude_ids`.
    pub async fn list_by_trait(
        pool: &PgPool,
        trait_id: DbId,
        exclude_ids: &[DbId],
    ) -> Result<Vec<TraitValue>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM trait_values
             WHERE trait_id = $1 AND NOT (id = ANY($2))
             ORDER BY id"
        );
        sqlx::query_as::<_, TraitValue>(&query)
            .bind(trait_id)
            .bind(exclude_ids)
            .fetch_all(pool)
            .await
    }
}
