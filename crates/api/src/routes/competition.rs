//! Route definitions for the sport competition module.

use axum::routing::{delete, get, patch, post, put};
use axum::Router;

use crate::handlers::competition;
use crate::state::AppState;

/// Routes mounted at `/competition`.
///
/// ```text
/// GET    /editions                                                 -> list_editions
/// POST   /editions                                                 -> create_edition (admin)
/// GET    /editions/active                                          -> get_active_edition
/// POST   /editions/{edition_id}/activate                           -> activate_edition (admin)
///
/// GET    /sports                                                   -> list_sports
/// POST   /sports                                                   -> create_sport (admin)
/// PATCH  /sports/{sport_id}                                        -> update_sport (admin)
/// DELETE /sports/{sport_id}                                        -> delete_sport (admin)
///
/// GET    /schools                                                  -> list_school_extensions
/// PUT    /schools/{school_id}                                      -> upsert_school_extension (admin)
/// GET    /schools/{school_id}/sports/{sport_id}/quotas             -> get_sport_quota
/// PUT    /schools/{school_id}/sports/{sport_id}/quotas             -> set_sport_quota (admin)
/// DELETE /schools/{school_id}/sports/{sport_id}/quotas             -> delete_sport_quota (admin)
///
/// POST   /teams                                                    -> create_team
/// GET    /teams/sports/{sport_id}                                  -> list_sport_teams
/// GET    /teams/schools/{school_id}                                -> list_school_teams
/// DELETE /teams/{team_id}                                          -> delete_team (captain or admin)
///
/// POST   /participants/sports/{sport_id}                           -> register_participant
/// GET    /participants/sports/{sport_id}                           -> list_sport_participants (admin)
/// DELETE /participants/sports/{sport_id}                           -> withdraw_participant
/// PATCH  /participants/sports/{sport_id}/users/{user_id}/license   -> set_license_validity (admin)
/// POST   /participants/sports/{sport_id}/users/{user_id}/license/check -> check_license (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/editions",
            get(competition::list_editions).post(competition::create_edition),
        )
        .route("/editions/active", get(competition::get_active_edition))
        .route(
            "/editions/{edition_id}/activate",
            post(competition::activate_edition),
        )
        .route(
            "/sports",
            get(competition::list_sports).post(competition::create_sport),
        )
        .route(
            "/sports/{sport_id}",
            patch(competition::update_sport).delete(competition::delete_sport),
        )
        .route("/schools", get(competition::list_school_extensions))
        .route(
            "/schools/{school_id}",
            put(competition::upsert_school_extension),
        )
        .route(
            "/schools/{school_id}/sports/{sport_id}/quotas",
            get(competition::get_sport_quota)
                .put(competition::set_sport_quota)
                .delete(competition::delete_sport_quota),
        )
        .route("/teams", post(competition::create_team))
        .route("/teams/sports/{sport_id}", get(competition::list_sport_teams))
        .route("/teams/schools/{school_id}", get(competition::list_school_teams))
        .route("/teams/{team_id}", delete(competition::delete_team))
        .route(
            "/participants/sports/{sport_id}",
            post(competition::register_participant)
                .get(competition::list_sport_participants)
                .delete(competition::withdraw_participant),
        )
        .route(
            "/participants/sports/{sport_id}/users/{user_id}/license",
            patch(competition::set_license_validity),
        )
        .route(
            "/participants/sports/{sport_id}/users/{user_id}/license/check",
            post(competition::check_license),
        )
}
