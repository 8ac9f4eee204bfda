//! Repository for the `collections` table.

use nftgen_core::types::DbId;
use sqlx::PgPool;

use crate::models::collection::{Collection, CreateCollection};

const COLUMNS: &str =
    "id, project_id, name, description, collection_type, supply, created_at, updated_at";

/// Provides CRUD operations for collections.
pub struct CollectionRepo;

impl CollectionRepo {
    /// Insert a new collection, returning the created row.
    ///
    /// If `collection_type` is `None` in the input, defaults to `generative`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCollection,
    ) -> Result<Collection, sqlx::Error> {
        let query = format!(
            "INSERT INTO collections (project_id, name, description, collection_type, supply)
             VALUES ($1, $2, $3, COALESCE($4, 'generative'), $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Collection>(&query)
            .bind(input.project_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.collection_type.map(|t| t.name()))
            .bind(input.supply)
            .fetch_one(pool)
            .await
    }

    /// Find a collection by ID within its project.
    pub async fn find(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
    ) -> Result<Option<Collection>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM collections WHERE id = $1 AND project_id = $2");
        sqlx::query_as::<_, Collection>(&query)
            .bind(id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }
}
