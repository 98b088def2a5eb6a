//! Repository for the `core_session` table.

use hyperion_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::session::{CreateSession, Session};

/// Column list for core_session queries.
const COLUMNS: &str = "id, user_id, refresh_token_hash, expires_at, is_revoked, created_at";

/// Refresh-token sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Open a new session.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateSession,
    ) -> Result<Session, sqlx::Error> {
        let query = format!(
            "INSERT INTO core_session (user_id, refresh_token_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(input.user_id)
            .bind(&input.refresh_token_hash)
            .bind(input.expires_at)
            .fetch_one(executor)
            .await
    }

    /// Revoke the active session holding `refresh_token_hash` and return it.
    ///
    /// A single conditional UPDATE, so of two concurrent redemptions of the
    /// same token only one gets a row back.
    pub async fn redeem(
        executor: impl PgExecutor<'_>,
        refresh_token_hash: &str,
    ) -> Result<Option<Session>, sqlx::Error> {
        let query = format!(
            "UPDATE core_session SET is_revoked = true
             WHERE refresh_token_hash = $1
               AND is_revoked = false
               AND expires_at > now()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(refresh_token_hash)
            .fetch_optional(executor)
            .await
    }

    /// Revoke every active session of a user. Returns the number revoked.
    pub async fn revoke_all_for_user(
        executor: impl PgExecutor<'_>,
        user_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE core_session SET is_revoked = true WHERE user_id = $1 AND is_revoked = false",
        )
        .bind(user_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
