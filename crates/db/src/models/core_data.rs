//! Singleton settings stored as JSON in `core_data`.

use serde::Serialize;
use sqlx::FromRow;

/// A row from the `core_data` table, keyed by schema name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CoreData {
    pub schema: String,
    pub data: serde_json::Value,
}
