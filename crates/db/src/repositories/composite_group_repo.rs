//! Repository for the `composite_groups` table.

use nftgen_core::types::DbId;
use sqlx::PgPool;

use crate::models::composite_group::{CompositeGroup, CreateCompositeGroup};

const COLUMNS: &str = "id, project_id, collection_id, shuffled_order, created_at, updated_at";

/// Provides CRUD operations for composite groups.
pub struct CompositeGroupRepo;

impl CompositeGroupRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateCompositeGroup,
    ) -> Result<CompositeGroup, sqlx::Error> {
        let query = format!(
            "INSERT INTO composite_groups (project_id, collection_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CompositeGroup>(&query)
            .bind(input.project_id)
            .bind(input.collection_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CompositeGroup>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM composite_groups WHERE id = $1");
        sqlx::query_as::<_, CompositeGroup>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Store a display permutation. Returns `false` if the group is missing.
    pub async fn set_shuffled_order(
        pool: &PgPool,
        id: DbId,
        order: &[i32],
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE composite_groups SET shuffled_order = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(order)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
