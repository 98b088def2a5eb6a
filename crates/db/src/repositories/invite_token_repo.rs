//! Repository for the `raid_invite` table.

use hyperion_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::raid::InviteToken;

/// Team invitation tokens, at most one per team.
pub struct InviteTokenRepo;

impl InviteTokenRepo {
    pub async fn create(
        executor: impl PgExecutor<'_>,
        token: &str,
        team_id: DbId,
    ) -> Result<InviteToken, sqlx::Error> {
        sqlx::query_as::<_, InviteToken>(
            "INSERT INTO raid_invite (token, team_id) VALUES ($1, $2)
             RETURNING id, token, team_id",
        )
        .bind(token)
        .bind(team_id)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_team(
        executor: impl PgExecutor<'_>,
        team_id: DbId,
    ) -> Result<Option<InviteToken>, sqlx::Error> {
        sqlx::query_as::<_, InviteToken>(
            "SELECT id, token, team_id FROM raid_invite WHERE team_id = $1",
        )
        .bind(team_id)
        .fetch_optional(executor)
        .await
    }

    pub async fn find_by_token(
        executor: impl PgExecutor<'_>,
        token: &str,
    ) -> Result<Option<InviteToken>, sqlx::Error> {
        sqlx::query_as::<_, InviteToken>(
            "SELECT id, token, team_id FROM raid_invite WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(executor)
        .await
    }

    pub async fn delete(executor: impl PgExecutor<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM raid_invite WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
