//! Raid registration models.

use chrono::NaiveDate;
use hyperion_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `raid_document` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Document {
    pub id: DbId,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub document_type: String,
    pub uploaded_at: Timestamp,
    pub validation: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateDocument {
    pub name: String,
    #[serde(rename = "type")]
    pub document_type: String,
}

/// A row from the `raid_security_file` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SecurityFile {
    pub id: DbId,
    pub allergy: Option<String>,
    pub asthma: bool,
    pub intensive_care_unit: Option<bool>,
    pub intensive_care_unit_when: Option<String>,
    pub ongoing_treatment: Option<String>,
    pub sicknesses: Option<String>,
    pub hospitalization: Option<String>,
    pub surgical_operation: Option<String>,
    pub trauma: Option<String>,
    pub family: Option<String>,
    pub emergency_person_firstname: Option<String>,
    pub emergency_person_name: Option<String>,
    pub emergency_person_phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSecurityFile {
    pub allergy: Option<String>,
    #[serde(default)]
    pub asthma: bool,
    pub intensive_care_unit: Option<bool>,
    pub intensive_care_unit_when: Option<String>,
    pub ongoing_treatment: Option<String>,
    pub sicknesses: Option<String>,
    pub hospitalization: Option<String>,
    pub surgical_operation: Option<String>,
    pub trauma: Option<String>,
    pub family: Option<String>,
    pub emergency_person_firstname: Option<String>,
    pub emergency_person_name: Option<String>,
    pub emergency_person_phone: Option<String>,
}

/// A row from the `raid_participant` table. The id is the user's id.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Participant {
    pub id: DbId,
    pub name: String,
    pub firstname: String,
    pub birthday: NaiveDate,
    pub phone: String,
    pub email: String,
    pub address: Option<String>,
    pub bike_size: Option<String>,
    pub t_shirt_size: Option<String>,
    pub situation: Option<String>,
    pub other_school: Option<String>,
    pub company: Option<String>,
    pub diet: Option<String>,
    pub id_card_id: Option<DbId>,
    pub medical_certificate_id: Option<DbId>,
    pub student_card_id: Option<DbId>,
    pub raid_rules_id: Option<DbId>,
    pub parent_authorization_id: Option<DbId>,
    pub security_file_id: Option<DbId>,
    pub attestation_on_honour: bool,
    pub payment: bool,
    pub is_minor: bool,
    pub created_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateParticipant {
    pub name: String,
    pub firstname: String,
    pub birthday: NaiveDate,
    pub phone: String,
    pub email: String,
    pub address: Option<String>,
    pub bike_size: Option<String>,
    pub t_shirt_size: Option<String>,
    pub situation: Option<String>,
    pub other_school: Option<String>,
    pub company: Option<String>,
    pub diet: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateParticipant {
    pub name: Option<String>,
    pub firstname: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub bike_size: Option<String>,
    pub t_shirt_size: Option<String>,
    pub situation: Option<String>,
    pub other_school: Option<String>,
    pub company: Option<String>,
    pub diet: Option<String>,
}

/// A row from the `raid_team` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Team {
    pub id: DbId,
    pub name: String,
    pub number: Option<i32>,
    pub difficulty: Option<String>,
    pub captain_id: DbId,
    pub second_id: Option<DbId>,
    pub meeting_place: Option<String>,
    pub validation_progress: f64,
    pub created_at: Timestamp,
}

/// A team with its members resolved.
#[derive(Debug, Clone, Serialize)]
pub struct TeamDetail {
    #[serde(flatten)]
    pub team: Team,
    pub captain: Participant,
    pub second: Option<Participant>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTeam {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTeam {
    pub name: Option<String>,
    pub difficulty: Option<String>,
    pub meeting_place: Option<String>,
}

/// A row from the `raid_invite` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InviteToken {
    pub id: DbId,
    pub token: String,
    pub team_id: DbId,
}

/// Raid dates and contacts, stored in `core_data`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RaidInformation {
    pub raid_start_date: Option<NaiveDate>,
    pub raid_end_date: Option<NaiveDate>,
    pub raid_registering_end_date: Option<NaiveDate>,
    pub payment_link: Option<String>,
    pub contact: Option<String>,
}

impl RaidInformation {
    /// Overlay the fields set in `update` onto `self`.
    pub fn merge(self, update: RaidInformation) -> RaidInformation {
        RaidInformation {
            raid_start_date: update.raid_start_date.or(self.raid_start_date),
            raid_end_date: update.raid_end_date.or(self.raid_end_date),
            raid_registering_end_date: update
                .raid_registering_end_date
                .or(self.raid_registering_end_date),
            payment_link: update.payment_link.or(self.payment_link),
            contact: update.contact.or(self.contact),
        }
    }
}
