//! Repository for the `core_user_recover_request` table.

use hyperion_core::types::{DbId, Timestamp};
use sqlx::PgExecutor;

use crate::models::user::RecoverRequest;

const COLUMNS: &str = "reset_token, user_id, created_on, expire_on";

/// Password reset requests. A user has at most one pending request.
pub struct RecoverRequestRepo;

impl RecoverRequestRepo {
    /// Create a reset request, replacing any previous one for the user.
    pub async fn upsert(
        executor: impl PgExecutor<'_>,
        user_id: DbId,
        reset_token: &str,
        expire_on: Timestamp,
    ) -> Result<RecoverRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO core_user_recover_request (reset_token, user_id, expire_on)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id) DO UPDATE SET
                reset_token = EXCLUDED.reset_token,
                created_on = now(),
                expire_on = EXCLUDED.expire_on
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RecoverRequest>(&query)
            .bind(reset_token)
            .bind(user_id)
            .bind(expire_on)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_token(
        executor: impl PgExecutor<'_>,
        reset_token: &str,
    ) -> Result<Option<RecoverRequest>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM core_user_recover_request WHERE reset_token = $1");
        sqlx::query_as::<_, RecoverRequest>(&query)
            .bind(reset_token)
            .fetch_optional(executor)
            .await
    }

    pub async fn delete_for_user(
        executor: impl PgExecutor<'_>,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM core_user_recover_request WHERE user_id = $1")
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
