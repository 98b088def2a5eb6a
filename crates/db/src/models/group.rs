//! Group and membership models.

use hyperion_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::user::UserSimple;

/// A row from the `core_group` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Group {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
}

/// A group together with its members.
#[derive(Debug, Clone, Serialize)]
pub struct GroupWithMembers {
    #[serde(flatten)]
    pub group: Group,
    pub members: Vec<UserSimple>,
}

/// DTO for creating a group.
#[derive(Debug, Deserialize)]
pub struct CreateGroup {
    pub name: String,
    pub description: Option<String>,
}

/// DTO for updating a group.
#[derive(Debug, Deserialize)]
pub struct UpdateGroup {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// A row from the `core_membership` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Membership {
    pub user_id: DbId,
    pub group_id: DbId,
    pub description: Option<String>,
}

/// DTO for adding a user to a group.
#[derive(Debug, Deserialize)]
pub struct CreateMembership {
    pub user_id: DbId,
    pub group_id: DbId,
    pub description: Option<String>,
}
