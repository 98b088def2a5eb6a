//! Repository for the `raid_document` table.

use hyperion_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::raid::{CreateDocument, Document};

const COLUMNS: &str = "id, name, type, uploaded_at, validation";

/// Uploaded participant documents.
pub struct RaidDocumentRepo;

impl RaidDocumentRepo {
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateDocument,
    ) -> Result<Document, sqlx::Error> {
        let query = format!(
            "INSERT INTO raid_document (name, type) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(&input.name)
            .bind(&input.document_type)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Document>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM raid_document WHERE id = $1");
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Every document attached to a participant.
    pub async fn list_for_participant(
        executor: impl PgExecutor<'_>,
        participant_id: DbId,
    ) -> Result<Vec<Document>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM raid_document d
             WHERE d.id IN (
                SELECT unnest(ARRAY[id_card_id, medical_certificate_id, student_card_id,
                                    raid_rules_id, parent_authorization_id])
                FROM raid_participant WHERE id = $1
             )"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(participant_id)
            .fetch_all(executor)
            .await
    }

    pub async fn update_validation(
        executor: impl PgExecutor<'_>,
        id: DbId,
        validation: &str,
    ) -> Result<Option<Document>, sqlx::Error> {
        let query =
            format!("UPDATE raid_document SET validation = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .bind(validation)
            .fetch_optional(executor)
            .await
    }
}
