//! Repository for the `competition_edition` table.

use hyperion_core::types::DbId;
use sqlx::{PgConnection, PgExecutor};

use crate::models::competition::{CreateEdition, Edition};

const COLUMNS: &str = "id, year, name, start_date, end_date, activated";

/// Competition editions. At most one is active.
pub struct EditionRepo;

impl EditionRepo {
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateEdition,
    ) -> Result<Edition, sqlx::Error> {
        let query = format!(
            "INSERT INTO competition_edition (year, name, start_date, end_date)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Edition>(&query)
            .bind(input.year)
            .bind(&input.name)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Edition>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM competition_edition WHERE id = $1");
        sqlx::query_as::<_, Edition>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// The active edition, if any.
    pub async fn find_active(executor: impl PgExecutor<'_>) -> Result<Option<Edition>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM competition_edition WHERE activated");
        sqlx::query_as::<_, Edition>(&query)
            .fetch_optional(executor)
            .await
    }

    pub async fn list(executor: impl PgExecutor<'_>) -> Result<Vec<Edition>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM competition_edition ORDER BY year DESC");
        sqlx::query_as::<_, Edition>(&query)
            .fetch_all(executor)
            .await
    }

    /// Make `id` the only active edition.
    pub async fn activate(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Edition>, sqlx::Error> {
        sqlx::query("UPDATE competition_edition SET activated = false WHERE activated AND id <> $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        let query = format!(
            "UPDATE competition_edition SET activated = true WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Edition>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }
}
