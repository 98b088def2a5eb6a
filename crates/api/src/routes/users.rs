//! Route definitions for the `/users` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// POST   /create           -> create_account (public)
/// POST   /activate         -> activate_account (public)
/// POST   /recover          -> recover (public)
/// POST   /reset-password   -> reset_password (public)
/// POST   /change-password  -> change_password
/// GET    /me               -> get_me
/// PATCH  /me               -> update_me
/// GET    /                 -> list_users (admin)
/// GET    /search           -> search_users
/// GET    /{id}             -> get_user
/// PATCH  /{id}             -> update_user (admin)
/// DELETE /{id}             -> delete_user (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users))
        .route("/create", post(users::create_account))
        .route("/activate", post(users::activate_account))
        .route("/recover", post(users::recover))
        .route("/reset-password", post(users::reset_password))
        .route("/change-password", post(users::change_password))
        .route("/me", get(users::get_me).patch(users::update_me))
        .route("/search", get(users::search_users))
        .route(
            "/{id}",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
}
