//! Repository for the `sdec_facturation_invoice_individual` table.

use chrono::NaiveDate;
use hyperion_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::sdec_facturation::{CreateInvoiceIndividual, InvoiceIndividual};

const COLUMNS: &str = "id, facture_number, member_id, individual_order, individual_category, \
    price, firstname, lastname, adresse, postal_code, city, country, facture_date, \
    valid, paid, payment_date";

/// Invoices addressed to individuals.
pub struct InvoiceIndividualRepo;

impl InvoiceIndividualRepo {
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateInvoiceIndividual,
    ) -> Result<InvoiceIndividual, sqlx::Error> {
        let query = format!(
            "INSERT INTO sdec_facturation_invoice_individual
                (facture_number, member_id, individual_order, individual_category, price,
                 firstname, lastname, adresse, postal_code, city, country, facture_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, COALESCE($12, CURRENT_DATE))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InvoiceIndividual>(&query)
            .bind(&input.facture_number)
            .bind(input.member_id)
            .bind(&input.individual_order)
            .bind(&input.individual_category)
            .bind(input.price)
            .bind(&input.firstname)
            .bind(&input.lastname)
            .bind(&input.adresse)
            .bind(&input.postal_code)
            .bind(&input.city)
            .bind(&input.country)
            .bind(input.facture_date)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<InvoiceIndividual>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM sdec_facturation_invoice_individual WHERE id = $1");
        sqlx::query_as::<_, InvoiceIndividual>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn list(
        executor: impl PgExecutor<'_>,
        include_hidden: bool,
    ) -> Result<Vec<InvoiceIndividual>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sdec_facturation_invoice_individual
             WHERE ($1 OR valid)
             ORDER BY facture_date DESC, facture_number DESC"
        );
        sqlx::query_as::<_, InvoiceIndividual>(&query)
            .bind(include_hidden)
            .fetch_all(executor)
            .await
    }

    pub async fn update_status(
        executor: impl PgExecutor<'_>,
        id: DbId,
        valid: Option<bool>,
        paid: Option<bool>,
        payment_date: Option<NaiveDate>,
    ) -> Result<Option<InvoiceIndividual>, sqlx::Error> {
        let query = format!(
            "UPDATE sdec_facturation_invoice_individual SET
                valid = COALESCE($2, valid),
                paid = COALESCE($3, paid),
                payment_date = CASE WHEN $3 = false THEN NULL
                                    ELSE COALESCE($4, payment_date) END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InvoiceIndividual>(&query)
            .bind(id)
            .bind(valid)
            .bind(paid)
            .bind(payment_date)
            .fetch_optional(executor)
            .await
    }

    pub async fn invalidate(executor: impl PgExecutor<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sdec_facturation_invoice_individual SET valid = false WHERE id = $1",
        )
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
