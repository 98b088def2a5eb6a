//! Repository for the `sdec_facturation_product` table.
//!
//! A product is identified by its `code`. Price changes append a new row, so
//! the current state of a product is its most recent row.

use sqlx::PgExecutor;

use crate::models::sdec_facturation::{CreateProduct, Product, UpdateProductMinor, UpdateProductPrice};

/// Column list for sdec_facturation_product queries.
const COLUMNS: &str = "id, code, name, individual_price, association_price, ae_price, \
    category, for_sale, creation_date";

pub struct ProductRepo;

impl ProductRepo {
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateProduct,
    ) -> Result<Product, sqlx::Error> {
        let query = format!(
            "INSERT INTO sdec_facturation_product
                (code, name, individual_price, association_price, ae_price, category)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(&input.code)
            .bind(&input.name)
            .bind(input.individual_price)
            .bind(input.association_price)
            .bind(input.ae_price)
            .bind(&input.category)
            .fetch_one(executor)
            .await
    }

    /// Latest row of a product.
    pub async fn find_latest_by_code(
        executor: impl PgExecutor<'_>,
        code: &str,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sdec_facturation_product
             WHERE code = $1
             ORDER BY creation_date DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(code)
            .fetch_optional(executor)
            .await
    }

    /// Whether a product other than `code` already uses `name`.
    pub async fn name_taken(
        executor: impl PgExecutor<'_>,
        name: &str,
        code: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                SELECT 1 FROM sdec_facturation_product
                WHERE name = $1 AND ($2::TEXT IS NULL OR code <> $2)
             )",
        )
        .bind(name)
        .bind(code)
        .fetch_one(executor)
        .await
    }

    /// Latest row of every product. Products no longer for sale are
    /// excluded unless `include_hidden`.
    pub async fn list_latest(
        executor: impl PgExecutor<'_>,
        include_hidden: bool,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM (
                SELECT DISTINCT ON (code) {COLUMNS}
                FROM sdec_facturation_product
                ORDER BY code, creation_date DESC
             ) latest
             WHERE ($1 OR for_sale)
             ORDER BY category, name"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(include_hidden)
            .fetch_all(executor)
            .await
    }

    /// Append a row carrying new prices, copying the rest from `current`.
    pub async fn insert_price(
        executor: impl PgExecutor<'_>,
        current: &Product,
        input: &UpdateProductPrice,
    ) -> Result<Product, sqlx::Error> {
        let query = format!(
            "INSERT INTO sdec_facturation_product
                (code, name, individual_price, association_price, ae_price, category, for_sale)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(&current.code)
            .bind(&current.name)
            .bind(input.individual_price)
            .bind(input.association_price)
            .bind(input.ae_price)
            .bind(&current.category)
            .bind(current.for_sale)
            .fetch_one(executor)
            .await
    }

    /// Rename or recategorize every row of a product. Returns the number of
    /// rows touched.
    pub async fn update_minor(
        executor: impl PgExecutor<'_>,
        code: &str,
        input: &UpdateProductMinor,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sdec_facturation_product SET
                name = COALESCE($2, name),
                category = COALESCE($3, category)
             WHERE code = $1",
        )
        .bind(code)
        .bind(&input.name)
        .bind(&input.category)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Withdraw a product from sale.
    pub async fn withdraw(executor: impl PgExecutor<'_>, code: &str) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("UPDATE sdec_facturation_product SET for_sale = false WHERE code = $1")
                .bind(code)
                .execute(executor)
                .await?;
        Ok(result.rows_affected())
    }
}
