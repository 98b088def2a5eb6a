//! School models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use hyperion_core::types::DbId;

/// A row from the `core_school` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct School {
    pub id: DbId,
    pub name: String,
    pub email_regex: String,
}

/// DTO for creating a school.
#[derive(Debug, Deserialize)]
pub struct CreateSchool {
    pub name: String,
    pub email_regex: String,
}

/// DTO for updating a school. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateSchool {
    pub name: Option<String>,
    pub email_regex: Option<String>,
}
