//! Repository for the `feed_news` table.

use hyperion_core::types::{DbId, Timestamp};
use sqlx::PgExecutor;

use crate::models::news::{CreateNews, News};

/// Column list for feed_news queries.
const COLUMNS: &str = "id, title, start, \"end\", entity, location, action_start, module, \
    module_object_id, image_folder, image_id, status, created_at";

/// Provides operations on feed news.
pub struct NewsRepo;

impl NewsRepo {
    /// Insert a news with the given initial status.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateNews,
        status: &str,
    ) -> Result<News, sqlx::Error> {
        let query = format!(
            "INSERT INTO feed_news
                (title, start, \"end\", entity, location, action_start, module,
                 module_object_id, image_folder, image_id, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, News>(&query)
            .bind(&input.title)
            .bind(input.start)
            .bind(input.end)
            .bind(&input.entity)
            .bind(&input.location)
            .bind(input.action_start)
            .bind(&input.module)
            .bind(input.module_object_id)
            .bind(&input.image_folder)
            .bind(input.image_id)
            .bind(status)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<News>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM feed_news WHERE id = $1");
        sqlx::query_as::<_, News>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Published news still displayed at `now`, by ascending start.
    pub async fn list_published(
        executor: impl PgExecutor<'_>,
        status: &str,
        now: Timestamp,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<News>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM feed_news
             WHERE status = $1 AND (\"end\" IS NULL OR \"end\" >= $2)
             ORDER BY start ASC, id
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, News>(&query)
            .bind(status)
            .bind(now)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await
    }

    /// Every news whose status is one of `statuses`, most recent first.
    pub async fn list_by_statuses(
        executor: impl PgExecutor<'_>,
        statuses: &[String],
        limit: i64,
        offset: i64,
    ) -> Result<Vec<News>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM feed_news
             WHERE status = ANY($1)
             ORDER BY start DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, News>(&query)
            .bind(statuses)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await
    }

    /// Set the status of a news. Returns `None` if it does not exist.
    pub async fn update_status(
        executor: impl PgExecutor<'_>,
        id: DbId,
        status: &str,
    ) -> Result<Option<News>, sqlx::Error> {
        let query = format!("UPDATE feed_news SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, News>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(executor)
            .await
    }

    /// Remove the news published for a module object. Returns the number removed.
    pub async fn delete_by_module_object(
        executor: impl PgExecutor<'_>,
        module: &str,
        module_object_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM feed_news WHERE module = $1 AND module_object_id = $2")
                .bind(module)
                .bind(module_object_id)
                .execute(executor)
                .await?;
        Ok(result.rows_affected())
    }
}
