//! Repository for the `competition_school_extension` table.

use hyperion_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::competition::SchoolExtension;

const COLUMNS: &str = "school_id, from_lyon, activated, ffsu_id";

/// Competition settings attached to a school.
pub struct SchoolExtensionRepo;

impl SchoolExtensionRepo {
    /// Insert or replace the extension of `input.school_id`.
    pub async fn upsert(
        executor: impl PgExecutor<'_>,
        input: &SchoolExtension,
    ) -> Result<SchoolExtension, sqlx::Error> {
        let query = format!(
            "INSERT INTO competition_school_extension (school_id, from_lyon, activated, ffsu_id)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (school_id) DO UPDATE SET
                from_lyon = EXCLUDED.from_lyon,
                activated = EXCLUDED.activated,
                ffsu_id = EXCLUDED.ffsu_id
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SchoolExtension>(&query)
            .bind(input.school_id)
            .bind(input.from_lyon)
            .bind(input.activated)
            .bind(&input.ffsu_id)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_school(
        executor: impl PgExecutor<'_>,
        school_id: DbId,
    ) -> Result<Option<SchoolExtension>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM competition_school_extension WHERE school_id = $1");
        sqlx::query_as::<_, SchoolExtension>(&query)
            .bind(school_id)
            .fetch_optional(executor)
            .await
    }

    pub async fn list(executor: impl PgExecutor<'_>) -> Result<Vec<SchoolExtension>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM competition_school_extension");
        sqlx::query_as::<_, SchoolExtension>(&query)
            .fetch_all(executor)
            .await
    }
}
