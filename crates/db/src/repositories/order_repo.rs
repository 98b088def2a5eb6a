//! Repository for the `sdec_facturation_order` table.

use hyperion_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::sdec_facturation::{CreateOrder, Order, UpdateOrder};

const COLUMNS: &str = "id, association_id, member_id, \"order\", creation_date, valid";

/// Print orders. Deletion invalidates the row.
pub struct OrderRepo;

impl OrderRepo {
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateOrder,
    ) -> Result<Order, sqlx::Error> {
        let query = format!(
            "INSERT INTO sdec_facturation_order (association_id, member_id, \"order\")
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(input.association_id)
            .bind(input.member_id)
            .bind(&input.order)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sdec_facturation_order WHERE id = $1");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List orders, newest first. Invalid orders are excluded unless
    /// `include_hidden`.
    pub async fn list(
        executor: impl PgExecutor<'_>,
        include_hidden: bool,
    ) -> Result<Vec<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sdec_facturation_order
             WHERE ($1 OR valid)
             ORDER BY creation_date DESC"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(include_hidden)
            .fetch_all(executor)
            .await
    }

    pub async fn update(
        executor: impl PgExecutor<'_>,
        id: DbId,
        input: &UpdateOrder,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!(
            "UPDATE sdec_facturation_order SET
                \"order\" = COALESCE($2, \"order\"),
                valid = COALESCE($3, valid)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(&input.order)
            .bind(input.valid)
            .fetch_optional(executor)
            .await
    }

    /// Soft-delete an order.
    pub async fn invalidate(executor: impl PgExecutor<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE sdec_facturation_order SET valid = false WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
