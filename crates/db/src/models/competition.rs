//! Sport competition models.

use chrono::NaiveDate;
use hyperion_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `competition_edition` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Edition {
    pub id: DbId,
    pub year: i32,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub activated: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateEdition {
    pub year: i32,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// A row from the `competition_sport` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Sport {
    pub id: DbId,
    pub name: String,
    pub team_size: i32,
    pub substitute_max: Option<i32>,
    pub category: Option<String>,
    pub activated: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateSport {
    pub name: String,
    pub team_size: i32,
    pub substitute_max: Option<i32>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSport {
    pub name: Option<String>,
    pub team_size: Option<i32>,
    pub substitute_max: Option<i32>,
    pub category: Option<String>,
    pub activated: Option<bool>,
}

/// A row from the `competition_school_extension` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SchoolExtension {
    pub school_id: DbId,
    pub from_lyon: bool,
    pub activated: bool,
    pub ffsu_id: Option<String>,
}

/// A row from the `competition_participant` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CompetitionParticipant {
    pub user_id: DbId,
    pub sport_id: DbId,
    pub edition_id: DbId,
    pub substitute: bool,
    pub license: Option<String>,
    pub is_license_valid: bool,
    pub team_id: Option<DbId>,
    pub created_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateCompetitionParticipant {
    #[serde(default)]
    pub substitute: bool,
    pub license: Option<String>,
    pub team_id: Option<DbId>,
}

/// A row from the `competition_team` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CompetitionTeam {
    pub id: DbId,
    pub edition_id: DbId,
    pub school_id: DbId,
    pub sport_id: DbId,
    pub name: String,
    pub captain_id: DbId,
    pub created_at: Timestamp,
}

/// Body of a team creation. The captain defaults to the caller.
#[derive(Debug, Deserialize)]
pub struct CreateCompetitionTeam {
    pub name: String,
    pub school_id: DbId,
    pub sport_id: DbId,
    pub captain_id: Option<DbId>,
}

/// A row from the `competition_sport_quota` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SportQuota {
    pub school_id: DbId,
    pub sport_id: DbId,
    pub edition_id: DbId,
    pub participant_quota: Option<i32>,
    pub team_quota: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct SetSportQuota {
    pub participant_quota: Option<i32>,
    pub team_quota: Option<i32>,
}
