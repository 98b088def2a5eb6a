//! Repository for the `core_data` table.

use sqlx::PgExecutor;

use crate::models::core_data::CoreData;

/// Singleton JSON settings keyed by schema name.
pub struct CoreDataRepo;

impl CoreDataRepo {
    pub async fn get(
        executor: impl PgExecutor<'_>,
        schema: &str,
    ) -> Result<Option<CoreData>, sqlx::Error> {
        sqlx::query_as::<_, CoreData>("SELECT schema, data FROM core_data WHERE schema = $1")
            .bind(schema)
            .fetch_optional(executor)
            .await
    }

    /// Insert or replace the data stored under `schema`.
    pub async fn upsert(
        executor: impl PgExecutor<'_>,
        schema: &str,
        data: &serde_json::Value,
    ) -> Result<CoreData, sqlx::Error> {
        sqlx::query_as::<_, CoreData>(
            "INSERT INTO core_data (schema, data) VALUES ($1, $2)
             ON CONFLICT (schema) DO UPDATE SET data = EXCLUDED.data
             RETURNING schema, data",
        )
        .bind(schema)
        .bind(data)
        .fetch_one(executor)
        .await
    }
}
