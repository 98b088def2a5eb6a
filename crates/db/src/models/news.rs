//! Feed news models.

use hyperion_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `feed_news` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct News {
    pub id: DbId,
    pub title: String,
    pub start: Timestamp,
    pub end: Option<Timestamp>,
    pub entity: String,
    pub location: Option<String>,
    pub action_start: Option<Timestamp>,
    pub module: String,
    pub module_object_id: DbId,
    pub image_folder: Option<String>,
    pub image_id: Option<DbId>,
    pub status: String,
    pub created_at: Timestamp,
}

/// DTO for publishing a news into the feed.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNews {
    pub title: String,
    pub start: Timestamp,
    pub end: Option<Timestamp>,
    pub entity: String,
    pub location: Option<String>,
    pub action_start: Option<Timestamp>,
    pub module: String,
    pub module_object_id: DbId,
    pub image_folder: Option<String>,
    pub image_id: Option<DbId>,
}
