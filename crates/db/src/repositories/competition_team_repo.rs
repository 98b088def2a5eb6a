//! Repository for the `competition_team` table.

use hyperion_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::competition::CompetitionTeam;

const COLUMNS: &str = "id, edition_id, school_id, sport_id, name, captain_id, created_at";

/// School teams entered in a sport for an edition.
pub struct CompetitionTeamRepo;

impl CompetitionTeamRepo {
    pub async fn create(
        executor: impl PgExecutor<'_>,
        edition_id: DbId,
        school_id: DbId,
        sport_id: DbId,
        name: &str,
        captain_id: DbId,
    ) -> Result<CompetitionTeam, sqlx::Error> {
        let query = format!(
            "INSERT INTO competition_team (edition_id, school_id, sport_id, name, captain_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CompetitionTeam>(&query)
            .bind(edition_id)
            .bind(school_id)
            .bind(sport_id)
            .bind(name)
            .bind(captain_id)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<CompetitionTeam>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM competition_team WHERE id = $1");
        sqlx::query_as::<_, CompetitionTeam>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Like [`find_by_id`](Self::find_by_id), locking the team row until the
    /// transaction ends so concurrent joins see each other.
    pub async fn find_for_update(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<CompetitionTeam>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM competition_team WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, CompetitionTeam>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Teams of a sport in an edition, by name.
    pub async fn list_for_sport(
        executor: impl PgExecutor<'_>,
        sport_id: DbId,
        edition_id: DbId,
    ) -> Result<Vec<CompetitionTeam>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM competition_team
             WHERE sport_id = $1 AND edition_id = $2
             ORDER BY name"
        );
        sqlx::query_as::<_, CompetitionTeam>(&query)
            .bind(sport_id)
            .bind(edition_id)
            .fetch_all(executor)
            .await
    }

    /// Teams of a school in an edition, by name.
    pub async fn list_for_school(
        executor: impl PgExecutor<'_>,
        school_id: DbId,
        edition_id: DbId,
    ) -> Result<Vec<CompetitionTeam>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM competition_team
             WHERE school_id = $1 AND edition_id = $2
             ORDER BY name"
        );
        sqlx::query_as::<_, CompetitionTeam>(&query)
            .bind(school_id)
            .bind(edition_id)
            .fetch_all(executor)
            .await
    }

    pub async fn count_for_school(
        executor: impl PgExecutor<'_>,
        school_id: DbId,
        sport_id: DbId,
        edition_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM competition_team
             WHERE school_id = $1 AND sport_id = $2 AND edition_id = $3",
        )
        .bind(school_id)
        .bind(sport_id)
        .bind(edition_id)
        .fetch_one(executor)
        .await
    }

    /// Delete a team. Its members stay registered without a team.
    pub async fn delete(executor: impl PgExecutor<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM competition_team WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
