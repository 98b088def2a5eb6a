//! Repository for the `raid_participant` table.

use hyperion_core::raid::{
    DOCUMENT_ID_CARD, DOCUMENT_MEDICAL_CERTIFICATE, DOCUMENT_PARENT_AUTHORIZATION,
    DOCUMENT_RAID_RULES, DOCUMENT_STUDENT_CARD,
};
use hyperion_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::raid::{CreateParticipant, Participant, UpdateParticipant};

/// Column list for raid_participant queries.
const COLUMNS: &str = "id, name, firstname, birthday, phone, email, address, bike_size, \
    t_shirt_size, situation, other_school, company, diet, id_card_id, medical_certificate_id, \
    student_card_id, raid_rules_id, parent_authorization_id, security_file_id, \
    attestation_on_honour, payment, is_minor, created_at";

/// Column holding the document of the given type, if the type is known.
fn document_column(document_type: &str) -> Option<&'static str> {
    match document_type {
        DOCUMENT_ID_CARD => Some("id_card_id"),
        DOCUMENT_MEDICAL_CERTIFICATE => Some("medical_certificate_id"),
        DOCUMENT_STUDENT_CARD => Some("student_card_id"),
        DOCUMENT_RAID_RULES => Some("raid_rules_id"),
        DOCUMENT_PARENT_AUTHORIZATION => Some("parent_authorization_id"),
        _ => None,
    }
}

/// Raid participants. A participant shares its id with the user.
pub struct RaidParticipantRepo;

impl RaidParticipantRepo {
    pub async fn create(
        executor: impl PgExecutor<'_>,
        user_id: DbId,
        input: &CreateParticipant,
        is_minor: bool,
    ) -> Result<Participant, sqlx::Error> {
        let query = format!(
            "INSERT INTO raid_participant
                (id, name, firstname, birthday, phone, email, address, bike_size,
                 t_shirt_size, situation, other_school, company, diet, is_minor)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Participant>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.firstname)
            .bind(input.birthday)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.address)
            .bind(&input.bike_size)
            .bind(&input.t_shirt_size)
            .bind(&input.situation)
            .bind(&input.other_school)
            .bind(&input.company)
            .bind(&input.diet)
            .bind(is_minor)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Participant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM raid_participant WHERE id = $1");
        sqlx::query_as::<_, Participant>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// The participant holding `document_id` in one of its document slots.
    pub async fn find_by_document(
        executor: impl PgExecutor<'_>,
        document_id: DbId,
    ) -> Result<Option<Participant>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM raid_participant
             WHERE $1 IN (id_card_id, medical_certificate_id, student_card_id,
                          raid_rules_id, parent_authorization_id)"
        );
        sqlx::query_as::<_, Participant>(&query)
            .bind(document_id)
            .fetch_optional(executor)
            .await
    }

    /// Update a participant's details. `is_minor` is recomputed by the caller.
    pub async fn update(
        executor: impl PgExecutor<'_>,
        id: DbId,
        input: &UpdateParticipant,
        is_minor: Option<bool>,
    ) -> Result<Option<Participant>, sqlx::Error> {
        let query = format!(
            "UPDATE raid_participant SET
                name = COALESCE($2, name),
                firstname = COALESCE($3, firstname),
                birthday = COALESCE($4, birthday),
                phone = COALESCE($5, phone),
                email = COALESCE($6, email),
                address = COALESCE($7, address),
                bike_size = COALESCE($8, bike_size),
                t_shirt_size = COALESCE($9, t_shirt_size),
                situation = COALESCE($10, situation),
                other_school = COALESCE($11, other_school),
                company = COALESCE($12, company),
                diet = COALESCE($13, diet),
                is_minor = COALESCE($14, is_minor)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Participant>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.firstname)
            .bind(input.birthday)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.address)
            .bind(&input.bike_size)
            .bind(&input.t_shirt_size)
            .bind(&input.situation)
            .bind(&input.other_school)
            .bind(&input.company)
            .bind(&input.diet)
            .bind(is_minor)
            .fetch_optional(executor)
            .await
    }

    /// Put a document into the participant slot matching its type.
    ///
    /// Returns `false` when the participant does not exist or the type has
    /// no slot.
    pub async fn attach_document(
        executor: impl PgExecutor<'_>,
        id: DbId,
        document_type: &str,
        document_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let Some(column) = document_column(document_type) else {
            return Ok(false);
        };
        let result = sqlx::query(&format!(
            "UPDATE raid_participant SET {column} = $2 WHERE id = $1"
        ))
        .bind(id)
        .bind(document_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_security_file(
        executor: impl PgExecutor<'_>,
        id: DbId,
        security_file_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE raid_participant SET security_file_id = $2 WHERE id = $1")
            .bind(id)
            .bind(security_file_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_payment(
        executor: impl PgExecutor<'_>,
        id: DbId,
        payment: bool,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE raid_participant SET payment = $2 WHERE id = $1")
            .bind(id)
            .bind(payment)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_attestation_on_honour(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE raid_participant SET attestation_on_honour = true WHERE id = $1")
                .bind(id)
                .execute(executor)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_document_type_has_a_slot() {
        for document_type in hyperion_core::raid::DOCUMENT_TYPES {
            assert!(document_column(document_type).is_some());
        }
        assert_eq!(document_column("passport"), None);
    }
}
