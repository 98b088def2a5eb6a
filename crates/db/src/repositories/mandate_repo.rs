//! Repository for the `sdec_facturation_mandate` table.

use sqlx::PgExecutor;

use crate::models::sdec_facturation::Mandate;

/// Print shop mandates, keyed by year.
pub struct MandateRepo;

impl MandateRepo {
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &Mandate,
    ) -> Result<Mandate, sqlx::Error> {
        sqlx::query_as::<_, Mandate>(
            "INSERT INTO sdec_facturation_mandate (year, name) VALUES ($1, $2)
             RETURNING year, name",
        )
        .bind(input.year)
        .bind(&input.name)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_year(
        executor: impl PgExecutor<'_>,
        year: i32,
    ) -> Result<Option<Mandate>, sqlx::Error> {
        sqlx::query_as::<_, Mandate>(
            "SELECT year, name FROM sdec_facturation_mandate WHERE year = $1",
        )
        .bind(year)
        .fetch_optional(executor)
        .await
    }

    /// List mandates, most recent first.
    pub async fn list(executor: impl PgExecutor<'_>) -> Result<Vec<Mandate>, sqlx::Error> {
        sqlx::query_as::<_, Mandate>(
            "SELECT year, name FROM sdec_facturation_mandate ORDER BY year DESC",
        )
        .fetch_all(executor)
        .await
    }

    pub async fn update_name(
        executor: impl PgExecutor<'_>,
        year: i32,
        name: &str,
    ) -> Result<Option<Mandate>, sqlx::Error> {
        sqlx::query_as::<_, Mandate>(
            "UPDATE sdec_facturation_mandate SET name = $2 WHERE year = $1
             RETURNING year, name",
        )
        .bind(year)
        .bind(name)
        .fetch_optional(executor)
        .await
    }

    /// Whether any member row references the mandate.
    pub async fn has_members(
        executor: impl PgExecutor<'_>,
        year: i32,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM sdec_facturation_member WHERE mandate = $1)",
        )
        .bind(year)
        .fetch_one(executor)
        .await
    }

    pub async fn delete(executor: impl PgExecutor<'_>, year: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sdec_facturation_mandate WHERE year = $1")
            .bind(year)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
