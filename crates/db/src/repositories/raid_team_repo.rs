//! Repository for the `raid_team` table.

use hyperion_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::raid::{Team, UpdateTeam};

/// Column list for raid_team queries.
const COLUMNS: &str = "id, name, number, difficulty, captain_id, second_id, meeting_place, \
    validation_progress, created_at";

/// Raid teams of one or two participants.
pub struct RaidTeamRepo;

impl RaidTeamRepo {
    /// Create a solo team captained by `captain_id`.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        name: &str,
        captain_id: DbId,
    ) -> Result<Team, sqlx::Error> {
        let query = format!(
            "INSERT INTO raid_team (name, captain_id) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Team>(&query)
            .bind(name)
            .bind(captain_id)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Team>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM raid_team WHERE id = $1");
        sqlx::query_as::<_, Team>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// The team a participant belongs to, as captain or second.
    pub async fn find_by_participant(
        executor: impl PgExecutor<'_>,
        participant_id: DbId,
    ) -> Result<Option<Team>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM raid_team WHERE captain_id = $1 OR second_id = $1"
        );
        sqlx::query_as::<_, Team>(&query)
            .bind(participant_id)
            .fetch_optional(executor)
            .await
    }

    /// List every team, numbered teams first.
    pub async fn list(executor: impl PgExecutor<'_>) -> Result<Vec<Team>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM raid_team ORDER BY number NULLS LAST, name");
        sqlx::query_as::<_, Team>(&query).fetch_all(executor).await
    }

    pub async fn update(
        executor: impl PgExecutor<'_>,
        id: DbId,
        input: &UpdateTeam,
    ) -> Result<Option<Team>, sqlx::Error> {
        let query = format!(
            "UPDATE raid_team SET
                name = COALESCE($2, name),
                difficulty = COALESCE($3, difficulty),
                meeting_place = COALESCE($4, meeting_place)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Team>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.difficulty)
            .bind(&input.meeting_place)
            .fetch_optional(executor)
            .await
    }

    pub async fn set_second(
        executor: impl PgExecutor<'_>,
        id: DbId,
        second_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE raid_team SET second_id = $2 WHERE id = $1")
            .bind(id)
            .bind(second_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Make the second the captain and leave the second slot empty.
    pub async fn promote_second(executor: impl PgExecutor<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE raid_team SET captain_id = second_id, second_id = NULL
             WHERE id = $1 AND second_id IS NOT NULL",
        )
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Overwrite the fields produced by merging another team into this one.
    pub async fn apply_merge(
        executor: impl PgExecutor<'_>,
        id: DbId,
        merged: &Team,
    ) -> Result<Option<Team>, sqlx::Error> {
        let query = format!(
            "UPDATE raid_team SET
                name = $2, number = $3, difficulty = $4, second_id = $5, meeting_place = $6
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Team>(&query)
            .bind(id)
            .bind(&merged.name)
            .bind(merged.number)
            .bind(&merged.difficulty)
            .bind(merged.second_id)
            .bind(&merged.meeting_place)
            .fetch_optional(executor)
            .await
    }

    pub async fn set_validation_progress(
        executor: impl PgExecutor<'_>,
        id: DbId,
        progress: f64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE raid_team SET validation_progress = $2 WHERE id = $1")
            .bind(id)
            .bind(progress)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_number(
        executor: impl PgExecutor<'_>,
        id: DbId,
        number: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE raid_team SET number = $2 WHERE id = $1")
            .bind(id)
            .bind(number)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Highest number already given to a team of `difficulty`.
    pub async fn max_number(
        executor: impl PgExecutor<'_>,
        difficulty: &str,
    ) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<i32>>(
            "SELECT MAX(number) FROM raid_team WHERE difficulty = $1",
        )
        .bind(difficulty)
        .fetch_one(executor)
        .await
    }

    pub async fn delete(executor: impl PgExecutor<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM raid_team WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every team. Returns the number removed.
    pub async fn delete_all(executor: impl PgExecutor<'_>) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM raid_team").execute(executor).await?;
        Ok(result.rows_affected())
    }
}
