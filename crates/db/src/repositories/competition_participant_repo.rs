//! Repository for the `competition_participant` table.

use hyperion_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::competition::{CompetitionParticipant, CreateCompetitionParticipant};

const COLUMNS: &str =
    "user_id, sport_id, edition_id, substitute, license, is_license_valid, team_id, created_at";

/// Registrations of users to a sport for an edition.
pub struct CompetitionParticipantRepo;

impl CompetitionParticipantRepo {
    pub async fn create(
        executor: impl PgExecutor<'_>,
        user_id: DbId,
        sport_id: DbId,
        edition_id: DbId,
        input: &CreateCompetitionParticipant,
    ) -> Result<CompetitionParticipant, sqlx::Error> {
        let query = format!(
            "INSERT INTO competition_participant
                (user_id, sport_id, edition_id, substitute, license, team_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CompetitionParticipant>(&query)
            .bind(user_id)
            .bind(sport_id)
            .bind(edition_id)
            .bind(input.substitute)
            .bind(&input.license)
            .bind(input.team_id)
            .fetch_one(executor)
            .await
    }

    pub async fn find(
        executor: impl PgExecutor<'_>,
        user_id: DbId,
        sport_id: DbId,
        edition_id: DbId,
    ) -> Result<Option<CompetitionParticipant>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM competition_participant
             WHERE user_id = $1 AND sport_id = $2 AND edition_id = $3"
        );
        sqlx::query_as::<_, CompetitionParticipant>(&query)
            .bind(user_id)
            .bind(sport_id)
            .bind(edition_id)
            .fetch_optional(executor)
            .await
    }

    /// Participants of a sport in an edition, in registration order.
    pub async fn list_for_sport(
        executor: impl PgExecutor<'_>,
        sport_id: DbId,
        edition_id: DbId,
    ) -> Result<Vec<CompetitionParticipant>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM competition_participant
             WHERE sport_id = $1 AND edition_id = $2
             ORDER BY created_at"
        );
        sqlx::query_as::<_, CompetitionParticipant>(&query)
            .bind(sport_id)
            .bind(edition_id)
            .fetch_all(executor)
            .await
    }

    /// Registrations of a school's students to a sport in an edition.
    pub async fn count_for_school(
        executor: impl PgExecutor<'_>,
        school_id: DbId,
        sport_id: DbId,
        edition_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM competition_participant p
             JOIN core_user u ON u.id = p.user_id
             WHERE u.school_id = $1 AND p.sport_id = $2 AND p.edition_id = $3",
        )
        .bind(school_id)
        .bind(sport_id)
        .bind(edition_id)
        .fetch_one(executor)
        .await
    }

    /// Players and substitutes already in a team.
    pub async fn count_in_team(
        executor: impl PgExecutor<'_>,
        team_id: DbId,
    ) -> Result<(i64, i64), sqlx::Error> {
        sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*) FILTER (WHERE NOT substitute),
                    COUNT(*) FILTER (WHERE substitute)
             FROM competition_participant WHERE team_id = $1",
        )
        .bind(team_id)
        .fetch_one(executor)
        .await
    }

    pub async fn set_license_validity(
        executor: impl PgExecutor<'_>,
        user_id: DbId,
        sport_id: DbId,
        edition_id: DbId,
        is_license_valid: bool,
    ) -> Result<Option<CompetitionParticipant>, sqlx::Error> {
        let query = format!(
            "UPDATE competition_participant SET is_license_valid = $4
             WHERE user_id = $1 AND sport_id = $2 AND edition_id = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CompetitionParticipant>(&query)
            .bind(user_id)
            .bind(sport_id)
            .bind(edition_id)
            .bind(is_license_valid)
            .fetch_optional(executor)
            .await
    }

    pub async fn delete(
        executor: impl PgExecutor<'_>,
        user_id: DbId,
        sport_id: DbId,
        edition_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM competition_participant
             WHERE user_id = $1 AND sport_id = $2 AND edition_id = $3",
        )
        .bind(user_id)
        .bind(sport_id)
        .bind(edition_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
