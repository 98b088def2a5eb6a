//! Repository for the `core_user_unconfirmed` table.

use sqlx::PgExecutor;

use crate::models::user::{CreateUnconfirmedUser, UnconfirmedUser};

const COLUMNS: &str = "id, email, account_type, school_id, activation_token, created_on, expire_on";

/// Pending account creation requests awaiting activation.
pub struct UnconfirmedUserRepo;

impl UnconfirmedUserRepo {
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateUnconfirmedUser,
    ) -> Result<UnconfirmedUser, sqlx::Error> {
        let query = format!(
            "INSERT INTO core_user_unconfirmed
                (email, account_type, school_id, activation_token, expire_on)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UnconfirmedUser>(&query)
            .bind(&input.email)
            .bind(&input.account_type)
            .bind(input.school_id)
            .bind(&input.activation_token)
            .bind(input.expire_on)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_token(
        executor: impl PgExecutor<'_>,
        activation_token: &str,
    ) -> Result<Option<UnconfirmedUser>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM core_user_unconfirmed WHERE activation_token = $1");
        sqlx::query_as::<_, UnconfirmedUser>(&query)
            .bind(activation_token)
            .fetch_optional(executor)
            .await
    }

    /// Drop every pending request for an email. Returns the number removed.
    pub async fn delete_by_email(
        executor: impl PgExecutor<'_>,
        email: &str,
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM core_user_unconfirmed WHERE lower(email) = lower($1)")
                .bind(email)
                .execute(executor)
                .await?;
        Ok(result.rows_affected())
    }
}
