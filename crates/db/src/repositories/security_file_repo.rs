//! Repository for the `raid_security_file` table.

use hyperion_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::raid::{CreateSecurityFile, SecurityFile};

const COLUMNS: &str = "id, allergy, asthma, intensive_care_unit, intensive_care_unit_when, \
    ongoing_treatment, sicknesses, hospitalization, surgical_operation, trauma, family, \
    emergency_person_firstname, emergency_person_name, emergency_person_phone";

/// Medical and emergency information of a participant.
pub struct SecurityFileRepo;

impl SecurityFileRepo {
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateSecurityFile,
    ) -> Result<SecurityFile, sqlx::Error> {
        let query = format!(
            "INSERT INTO raid_security_file
                (allergy, asthma, intensive_care_unit, intensive_care_unit_when,
                 ongoing_treatment, sicknesses, hospitalization, surgical_operation, trauma,
                 family, emergency_person_firstname, emergency_person_name,
                 emergency_person_phone)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SecurityFile>(&query)
            .bind(&input.allergy)
            .bind(input.asthma)
            .bind(input.intensive_care_unit)
            .bind(&input.intensive_care_unit_when)
            .bind(&input.ongoing_treatment)
            .bind(&input.sicknesses)
            .bind(&input.hospitalization)
            .bind(&input.surgical_operation)
            .bind(&input.trauma)
            .bind(&input.family)
            .bind(&input.emergency_person_firstname)
            .bind(&input.emergency_person_name)
            .bind(&input.emergency_person_phone)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<SecurityFile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM raid_security_file WHERE id = $1");
        sqlx::query_as::<_, SecurityFile>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Overwrite every field of an existing security file.
    pub async fn replace(
        executor: impl PgExecutor<'_>,
        id: DbId,
        input: &CreateSecurityFile,
    ) -> Result<Option<SecurityFile>, sqlx::Error> {
        let query = format!(
            "UPDATE raid_security_file SET
                allergy = $2, asthma = $3, intensive_care_unit = $4,
                intensive_care_unit_when = $5, ongoing_treatment = $6, sicknesses = $7,
                hospitalization = $8, surgical_operation = $9, trauma = $10, family = $11,
                emergency_person_firstname = $12, emergency_person_name = $13,
                emergency_person_phone = $14
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SecurityFile>(&query)
            .bind(id)
            .bind(&input.allergy)
            .bind(input.asthma)
            .bind(input.intensive_care_unit)
            .bind(&input.intensive_care_unit_when)
            .bind(&input.ongoing_treatment)
            .bind(&input.sicknesses)
            .bind(&input.hospitalization)
            .bind(&input.surgical_operation)
            .bind(&input.trauma)
            .bind(&input.family)
            .bind(&input.emergency_person_firstname)
            .bind(&input.emergency_person_name)
            .bind(&input.emergency_person_phone)
            .fetch_optional(executor)
            .await
    }
}
