//! Repository for the `sdec_facturation_invoice_association` table.

use chrono::NaiveDate;
use hyperion_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::sdec_facturation::{CreateInvoiceAssociation, InvoiceAssociation};

const COLUMNS: &str = "id, facture_number, member_id, association_id, association_order, \
    price, facture_date, start_date, end_date, valid, paid, payment_date";

/// Invoices addressed to associations.
pub struct InvoiceAssociationRepo;

impl InvoiceAssociationRepo {
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateInvoiceAssociation,
    ) -> Result<InvoiceAssociation, sqlx::Error> {
        let query = format!(
            "INSERT INTO sdec_facturation_invoice_association
                (facture_number, member_id, association_id, association_order, price,
                 facture_date, start_date, end_date)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, CURRENT_DATE), $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InvoiceAssociation>(&query)
            .bind(&input.facture_number)
            .bind(input.member_id)
            .bind(input.association_id)
            .bind(&input.association_order)
            .bind(input.price)
            .bind(input.facture_date)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<InvoiceAssociation>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM sdec_facturation_invoice_association WHERE id = $1");
        sqlx::query_as::<_, InvoiceAssociation>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List invoices, newest first. Invalid ones are excluded unless
    /// `include_hidden`.
    pub async fn list(
        executor: impl PgExecutor<'_>,
        include_hidden: bool,
    ) -> Result<Vec<InvoiceAssociation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sdec_facturation_invoice_association
             WHERE ($1 OR valid)
             ORDER BY facture_date DESC, facture_number DESC"
        );
        sqlx::query_as::<_, InvoiceAssociation>(&query)
            .bind(include_hidden)
            .fetch_all(executor)
            .await
    }

    /// Apply a resolved status change.
    pub async fn update_status(
        executor: impl PgExecutor<'_>,
        id: DbId,
        valid: Option<bool>,
        paid: Option<bool>,
        payment_date: Option<NaiveDate>,
    ) -> Result<Option<InvoiceAssociation>, sqlx::Error> {
        let query = format!(
            "UPDATE sdec_facturation_invoice_association SET
                valid = COALESCE($2, valid),
                paid = COALESCE($3, paid),
                payment_date = CASE WHEN $3 = false THEN NULL
                                    ELSE COALESCE($4, payment_date) END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InvoiceAssociation>(&query)
            .bind(id)
            .bind(valid)
            .bind(paid)
            .bind(payment_date)
            .fetch_optional(executor)
            .await
    }

    /// Soft-delete an invoice.
    pub async fn invalidate(executor: impl PgExecutor<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sdec_facturation_invoice_association SET valid = false WHERE id = $1",
        )
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
