//! Repository for the `competition_sport_quota` table.

use hyperion_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::competition::{SetSportQuota, SportQuota};

const COLUMNS: &str = "school_id, sport_id, edition_id, participant_quota, team_quota";

/// How many participants and teams a school may enter in a sport.
pub struct SportQuotaRepo;

impl SportQuotaRepo {
    /// Insert or replace the quota of a school for a sport.
    pub async fn upsert(
        executor: impl PgExecutor<'_>,
        school_id: DbId,
        sport_id: DbId,
        edition_id: DbId,
        input: &SetSportQuota,
    ) -> Result<SportQuota, sqlx::Error> {
        let query = format!(
            "INSERT INTO competition_sport_quota
                (school_id, sport_id, edition_id, participant_quota, team_quota)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (school_id, sport_id, edition_id) DO UPDATE SET
                participant_quota = EXCLUDED.participant_quota,
                team_quota = EXCLUDED.team_quota
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SportQuota>(&query)
            .bind(school_id)
            .bind(sport_id)
            .bind(edition_id)
            .bind(input.participant_quota)
            .bind(input.team_quota)
            .fetch_one(executor)
            .await
    }

    pub async fn find(
        executor: impl PgExecutor<'_>,
        school_id: DbId,
        sport_id: DbId,
        edition_id: DbId,
    ) -> Result<Option<SportQuota>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM competition_sport_quota
             WHERE school_id = $1 AND sport_id = $2 AND edition_id = $3"
        );
        sqlx::query_as::<_, SportQuota>(&query)
            .bind(school_id)
            .bind(sport_id)
            .bind(edition_id)
            .fetch_optional(executor)
            .await
    }

    /// Like [`find`](Self::find), holding a row lock until the transaction
    /// ends so concurrent registrations are counted one after the other.
    pub async fn find_for_update(
        executor: impl PgExecutor<'_>,
        school_id: DbId,
        sport_id: DbId,
        edition_id: DbId,
    ) -> Result<Option<SportQuota>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM competition_sport_quota
             WHERE school_id = $1 AND sport_id = $2 AND edition_id = $3
             FOR UPDATE"
        );
        sqlx::query_as::<_, SportQuota>(&query)
            .bind(school_id)
            .bind(sport_id)
            .bind(edition_id)
            .fetch_optional(executor)
            .await
    }

    pub async fn delete(
        executor: impl PgExecutor<'_>,
        school_id: DbId,
        sport_id: DbId,
        edition_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM competition_sport_quota
             WHERE school_id = $1 AND sport_id = $2 AND edition_id = $3",
        )
        .bind(school_id)
        .bind(sport_id)
        .bind(edition_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
