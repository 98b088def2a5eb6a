//! Repository for the `core_membership` table.

use hyperion_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::group::{CreateMembership, Membership};
use crate::models::user::UserSimple;

const COLUMNS: &str = "user_id, group_id, description";

/// Links between users and groups.
pub struct MembershipRepo;

impl MembershipRepo {
    /// Add a user to a group.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateMembership,
    ) -> Result<Membership, sqlx::Error> {
        let query = format!(
            "INSERT INTO core_membership (user_id, group_id, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Membership>(&query)
            .bind(input.user_id)
            .bind(input.group_id)
            .bind(&input.description)
            .fetch_one(executor)
            .await
    }

    /// Add a user to a group unless already a member.
    pub async fn create_if_missing(
        executor: impl PgExecutor<'_>,
        user_id: DbId,
        group_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO core_membership (user_id, group_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(group_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether the user belongs to the group.
    pub async fn exists(
        executor: impl PgExecutor<'_>,
        user_id: DbId,
        group_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                SELECT 1 FROM core_membership WHERE user_id = $1 AND group_id = $2
             )",
        )
        .bind(user_id)
        .bind(group_id)
        .fetch_one(executor)
        .await
    }

    /// Whether the user belongs to at least one of the groups.
    pub async fn exists_any(
        executor: impl PgExecutor<'_>,
        user_id: DbId,
        group_ids: &[DbId],
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                SELECT 1 FROM core_membership WHERE user_id = $1 AND group_id = ANY($2)
             )",
        )
        .bind(user_id)
        .bind(group_ids)
        .fetch_one(executor)
        .await
    }

    pub async fn delete(
        executor: impl PgExecutor<'_>,
        user_id: DbId,
        group_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM core_membership WHERE user_id = $1 AND group_id = $2")
                .bind(user_id)
                .bind(group_id)
                .execute(executor)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove every member of a group. Returns the number removed.
    pub async fn delete_all_for_group(
        executor: impl PgExecutor<'_>,
        group_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM core_membership WHERE group_id = $1")
            .bind(group_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Ids of the groups a user belongs to.
    pub async fn group_ids_for_user(
        executor: impl PgExecutor<'_>,
        user_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT group_id FROM core_membership WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(executor)
            .await
    }

    /// Members of a group, ordered by name.
    pub async fn members(
        executor: impl PgExecutor<'_>,
        group_id: DbId,
    ) -> Result<Vec<UserSimple>, sqlx::Error> {
        sqlx::query_as::<_, UserSimple>(
            "SELECT u.id, u.name, u.firstname, u.nickname, u.account_type, u.school_id
             FROM core_user u
             JOIN core_membership m ON m.user_id = u.id
             WHERE m.group_id = $1
             ORDER BY u.name, u.firstname",
        )
        .bind(group_id)
        .fetch_all(executor)
        .await
    }

    /// Email addresses of every member of a group.
    pub async fn emails_in_group(
        executor: impl PgExecutor<'_>,
        group_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT u.email FROM core_user u
             JOIN core_membership m ON m.user_id = u.id
             WHERE m.group_id = $1",
        )
        .bind(group_id)
        .fetch_all(executor)
        .await
    }
}
