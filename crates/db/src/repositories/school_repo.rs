//! Repository for the `core_school` table.

use hyperion_core::schools::SCHOOL_NO_SCHOOL;
use hyperion_core::types::DbId;
use sqlx::{PgConnection, PgExecutor};

use crate::models::school::{CreateSchool, School, UpdateSchool};

/// Column list for core_school queries.
const COLUMNS: &str = "id, name, email_regex";

/// Provides CRUD operations for schools.
pub struct SchoolRepo;

impl SchoolRepo {
    /// Insert a new school, returning the created row.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateSchool,
    ) -> Result<School, sqlx::Error> {
        let query = format!(
            "INSERT INTO core_school (name, email_regex)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, School>(&query)
            .bind(&input.name)
            .bind(&input.email_regex)
            .fetch_one(executor)
            .await
    }

    /// Find a school by its id.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<School>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM core_school WHERE id = $1");
        sqlx::query_as::<_, School>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a school by its exact name.
    pub async fn find_by_name(
        executor: impl PgExecutor<'_>,
        name: &str,
    ) -> Result<Option<School>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM core_school WHERE name = $1");
        sqlx::query_as::<_, School>(&query)
            .bind(name)
            .fetch_optional(executor)
            .await
    }

    /// List all schools ordered by name.
    pub async fn list(executor: impl PgExecutor<'_>) -> Result<Vec<School>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM core_school ORDER BY name");
        sqlx::query_as::<_, School>(&query)
            .fetch_all(executor)
            .await
    }

    /// Update a school. Returns `None` if no row with the given id exists.
    pub async fn update(
        executor: impl PgExecutor<'_>,
        id: DbId,
        input: &UpdateSchool,
    ) -> Result<Option<School>, sqlx::Error> {
        let query = format!(
            "UPDATE core_school SET
                name = COALESCE($2, name),
                email_regex = COALESCE($3, email_regex)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, School>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email_regex)
            .fetch_optional(executor)
            .await
    }

    /// Delete a school, moving its users to the placeholder school first.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        for table in ["core_user", "core_user_unconfirmed"] {
            sqlx::query(&format!(
                "UPDATE {table} SET school_id = $2 WHERE school_id = $1"
            ))
            .bind(id)
            .bind(SCHOOL_NO_SCHOOL)
            .execute(&mut *conn)
            .await?;
        }

        let result = sqlx::query("DELETE FROM core_school WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
