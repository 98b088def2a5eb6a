//! Repository for the `sdec_facturation_member` table.

use hyperion_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::sdec_facturation::{CreateMember, Member, UpdateMember};

const COLUMNS: &str = "id, name, mandate, role, visible, modified_date";

/// Print shop staff members. Deletion hides the row.
pub struct SdecMemberRepo;

impl SdecMemberRepo {
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateMember,
    ) -> Result<Member, sqlx::Error> {
        let query = format!(
            "INSERT INTO sdec_facturation_member (name, mandate, role, visible)
             VALUES ($1, $2, $3, COALESCE($4, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(&input.name)
            .bind(input.mandate)
            .bind(&input.role)
            .bind(input.visible)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Member>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sdec_facturation_member WHERE id = $1");
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_by_name(
        executor: impl PgExecutor<'_>,
        name: &str,
    ) -> Result<Option<Member>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sdec_facturation_member WHERE name = $1");
        sqlx::query_as::<_, Member>(&query)
            .bind(name)
            .fetch_optional(executor)
            .await
    }

    /// List members. Hidden members are excluded unless `include_hidden`.
    pub async fn list(
        executor: impl PgExecutor<'_>,
        include_hidden: bool,
    ) -> Result<Vec<Member>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sdec_facturation_member
             WHERE ($1 OR visible)
             ORDER BY mandate DESC, name"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(include_hidden)
            .fetch_all(executor)
            .await
    }

    /// Update a member and stamp `modified_date`.
    pub async fn update(
        executor: impl PgExecutor<'_>,
        id: DbId,
        input: &UpdateMember,
    ) -> Result<Option<Member>, sqlx::Error> {
        let query = format!(
            "UPDATE sdec_facturation_member SET
                name = COALESCE($2, name),
                mandate = COALESCE($3, mandate),
                role = COALESCE($4, role),
                visible = COALESCE($5, visible),
                modified_date = CURRENT_DATE
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.mandate)
            .bind(&input.role)
            .bind(input.visible)
            .fetch_optional(executor)
            .await
    }

    /// Soft-delete a member. Returns `true` if the member exists.
    pub async fn hide(executor: impl PgExecutor<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sdec_facturation_member
             SET visible = false, modified_date = CURRENT_DATE
             WHERE id = $1",
        )
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
