//! Route definitions for raid registration.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::raid;
use crate::state::AppState;

/// Routes mounted at `/raid`.
///
/// ```text
/// POST   /participants                                   -> create_participant
/// GET    /participants/{participant_id}                  -> get_participant
/// PATCH  /participants/{participant_id}                  -> update_participant
/// GET    /participants/{participant_id}/team             -> get_team_by_participant
/// GET    /participants/{participant_id}/documents        -> list_documents
/// POST   /participants/{participant_id}/documents        -> attach_document
/// POST   /participants/{participant_id}/security_file    -> set_security_file
/// POST   /participants/{participant_id}/payment          -> confirm_payment (raid admin)
/// POST   /participants/{participant_id}/honour           -> confirm_attestation_on_honour
///
/// GET    /teams                                          -> list_teams (raid admin)
/// POST   /teams                                          -> create_team
/// DELETE /teams                                          -> delete_all_teams (raid admin)
/// POST   /teams/merge                                    -> merge_teams (raid admin)
/// POST   /teams/join/{token}                             -> join_team
/// GET    /teams/{team_id}                                -> get_team (raid admin)
/// PATCH  /teams/{team_id}                                -> update_team
/// DELETE /teams/{team_id}                                -> delete_team (raid admin)
/// POST   /teams/{team_id}/invite                         -> create_invite_token
/// POST   /teams/{team_id}/kick/{participant_id}          -> kick_team_member (raid admin)
///
/// PATCH  /documents/{document_id}/validation             -> set_document_validation (raid admin)
///
/// GET    /information                                    -> get_information
/// PATCH  /information                                    -> update_information (raid admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/participants", post(raid::create_participant))
        .route(
            "/participants/{participant_id}",
            get(raid::get_participant).patch(raid::update_participant),
        )
        .route(
            "/participants/{participant_id}/team",
            get(raid::get_team_by_participant),
        )
        .route(
            "/participants/{participant_id}/documents",
            get(raid::list_documents).post(raid::attach_document),
        )
        .route(
            "/participants/{participant_id}/security_file",
            post(raid::set_security_file),
        )
        .route(
            "/participants/{participant_id}/payment",
            post(raid::confirm_payment),
        )
        .route(
            "/participants/{participant_id}/honour",
            post(raid::confirm_attestation_on_honour),
        )
        .route(
            "/teams",
            get(raid::list_teams)
                .post(raid::create_team)
                .delete(raid::delete_all_teams),
        )
        .route("/teams/merge", post(raid::merge_teams))
        .route("/teams/join/{token}", post(raid::join_team))
        .route(
            "/teams/{team_id}",
            get(raid::get_team)
                .patch(raid::update_team)
                .delete(raid::delete_team),
        )
        .route("/teams/{team_id}/invite", post(raid::create_invite_token))
        .route(
            "/teams/{team_id}/kick/{participant_id}",
            post(raid::kick_team_member),
        )
        .route(
            "/documents/{document_id}/validation",
            patch(raid::set_document_validation),
        )
        .route(
            "/information",
            get(raid::get_information).patch(raid::update_information),
        )
}
