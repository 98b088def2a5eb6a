//! Repository for the `core_user` table.

use hyperion_core::types::DbId;
use sqlx::{PgConnection, PgExecutor};

use crate::models::user::{CreateUser, UpdateUser, User, UserSimple};

/// Column list for core_user queries.
const COLUMNS: &str = "id, email, school_id, password_hash, account_type, name, firstname, \
    nickname, birthday, promo, phone, floor, created_on";

/// Column list for the public user projection.
const SIMPLE_COLUMNS: &str = "id, name, firstname, nickname, account_type, school_id";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a confirmed user, returning the created row.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateUser,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO core_user
                (email, school_id, password_hash, account_type, name, firstname,
                 nickname, birthday, promo, phone, floor)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(input.school_id)
            .bind(&input.password_hash)
            .bind(&input.account_type)
            .bind(&input.name)
            .bind(&input.firstname)
            .bind(&input.nickname)
            .bind(input.birthday)
            .bind(input.promo)
            .bind(&input.phone)
            .bind(&input.floor)
            .fetch_one(executor)
            .await
    }

    /// Find a user by id.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM core_user WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(
        executor: impl PgExecutor<'_>,
        email: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM core_user WHERE lower(email) = lower($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(executor)
            .await
    }

    /// List users, optionally restricted to some account types and to the
    /// members of a group.
    pub async fn list(
        executor: impl PgExecutor<'_>,
        account_types: Option<&[String]>,
        group_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM core_user u
             WHERE ($1::TEXT[] IS NULL OR u.account_type = ANY($1))
               AND ($2::UUID IS NULL OR EXISTS (
                    SELECT 1 FROM core_membership m
                    WHERE m.user_id = u.id AND m.group_id = $2))
             ORDER BY u.name, u.firstname
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(account_types)
            .bind(group_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await
    }

    /// Search users whose name, firstname or nickname match an ILIKE pattern.
    pub async fn search(
        executor: impl PgExecutor<'_>,
        pattern: &str,
        limit: i64,
    ) -> Result<Vec<UserSimple>, sqlx::Error> {
        let query = format!(
            "SELECT {SIMPLE_COLUMNS} FROM core_user
             WHERE name ILIKE $1 OR firstname ILIKE $1 OR nickname ILIKE $1
                OR (firstname || ' ' || name) ILIKE $1
             ORDER BY name, firstname
             LIMIT $2"
        );
        sqlx::query_as::<_, UserSimple>(&query)
            .bind(pattern)
            .bind(limit)
            .fetch_all(executor)
            .await
    }

    /// Update a user. Returns `None` if no row with the given id exists.
    pub async fn update(
        executor: impl PgExecutor<'_>,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE core_user SET
                name = COALESCE($2, name),
                firstname = COALESCE($3, firstname),
                nickname = COALESCE($4, nickname),
                birthday = COALESCE($5, birthday),
                promo = COALESCE($6, promo),
                phone = COALESCE($7, phone),
                floor = COALESCE($8, floor),
                school_id = COALESCE($9, school_id),
                account_type = COALESCE($10, account_type)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.firstname)
            .bind(&input.nickname)
            .bind(input.birthday)
            .bind(input.promo)
            .bind(&input.phone)
            .bind(&input.floor)
            .bind(input.school_id)
            .bind(&input.account_type)
            .fetch_optional(executor)
            .await
    }

    /// Replace a user's password hash. Returns `true` if the user exists.
    pub async fn update_password(
        executor: impl PgExecutor<'_>,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE core_user SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a user with its memberships and sessions.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query("DELETE FROM core_membership WHERE user_id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        sqlx::query("DELETE FROM core_session WHERE user_id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        let result = sqlx::query("DELETE FROM core_user WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
