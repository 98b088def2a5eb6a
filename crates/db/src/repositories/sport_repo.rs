//! Repository for the `competition_sport` table.

use hyperion_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::competition::{CreateSport, Sport, UpdateSport};

const COLUMNS: &str = "id, name, team_size, substitute_max, category, activated";

pub struct SportRepo;

impl SportRepo {
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateSport,
    ) -> Result<Sport, sqlx::Error> {
        let query = format!(
            "INSERT INTO competition_sport (name, team_size, substitute_max, category)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Sport>(&query)
            .bind(&input.name)
            .bind(input.team_size)
            .bind(input.substitute_max)
            .bind(&input.category)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Sport>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM competition_sport WHERE id = $1");
        sqlx::query_as::<_, Sport>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List sports. Deactivated sports are excluded unless `include_inactive`.
    pub async fn list(
        executor: impl PgExecutor<'_>,
        include_inactive: bool,
    ) -> Result<Vec<Sport>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM competition_sport WHERE ($1 OR activated) ORDER BY name"
        );
        sqlx::query_as::<_, Sport>(&query)
            .bind(include_inactive)
            .fetch_all(executor)
            .await
    }

    pub async fn update(
        executor: impl PgExecutor<'_>,
        id: DbId,
        input: &UpdateSport,
    ) -> Result<Option<Sport>, sqlx::Error> {
        let query = format!(
            "UPDATE competition_sport SET
                name = COALESCE($2, name),
                team_size = COALESCE($3, team_size),
                substitute_max = COALESCE($4, substitute_max),
                category = COALESCE($5, category),
                activated = COALESCE($6, activated)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Sport>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.team_size)
            .bind(input.substitute_max)
            .bind(&input.category)
            .bind(input.activated)
            .fetch_optional(executor)
            .await
    }

    pub async fn delete(executor: impl PgExecutor<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM competition_sport WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
