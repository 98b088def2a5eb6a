//! Repository for the `sdec_facturation_association` table.

use hyperion_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::sdec_facturation::{Association, CreateAssociation, UpdateAssociation};

const COLUMNS: &str = "id, name, type, structure, visible, modified_date";

/// Print shop client associations. Deletion hides the row.
pub struct AssociationRepo;

impl AssociationRepo {
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateAssociation,
    ) -> Result<Association, sqlx::Error> {
        let query = format!(
            "INSERT INTO sdec_facturation_association (name, type, structure, visible)
             VALUES ($1, $2, $3, COALESCE($4, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Association>(&query)
            .bind(&input.name)
            .bind(&input.association_type)
            .bind(&input.structure)
            .bind(input.visible)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Association>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sdec_facturation_association WHERE id = $1");
        sqlx::query_as::<_, Association>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_by_name(
        executor: impl PgExecutor<'_>,
        name: &str,
    ) -> Result<Option<Association>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM sdec_facturation_association WHERE name = $1");
        sqlx::query_as::<_, Association>(&query)
            .bind(name)
            .fetch_optional(executor)
            .await
    }

    /// List associations. Hidden ones are excluded unless `include_hidden`.
    pub async fn list(
        executor: impl PgExecutor<'_>,
        include_hidden: bool,
    ) -> Result<Vec<Association>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sdec_facturation_association
             WHERE ($1 OR visible)
             ORDER BY name"
        );
        sqlx::query_as::<_, Association>(&query)
            .bind(include_hidden)
            .fetch_all(executor)
            .await
    }

    pub async fn update(
        executor: impl PgExecutor<'_>,
        id: DbId,
        input: &UpdateAssociation,
    ) -> Result<Option<Association>, sqlx::Error> {
        let query = format!(
            "UPDATE sdec_facturation_association SET
                name = COALESCE($2, name),
                type = COALESCE($3, type),
                structure = COALESCE($4, structure),
                visible = COALESCE($5, visible),
                modified_date = CURRENT_DATE
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Association>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.association_type)
            .bind(&input.structure)
            .bind(input.visible)
            .fetch_optional(executor)
            .await
    }

    /// Soft-delete an association.
    pub async fn hide(executor: impl PgExecutor<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sdec_facturation_association
             SET visible = false, modified_date = CURRENT_DATE
             WHERE id = $1",
        )
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
