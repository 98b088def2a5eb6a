pub mod auth;
pub mod competition;
pub mod feed;
pub mod groups;
pub mod health;
pub mod raid;
pub mod schools;
pub mod sdec_facturation;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                     login (public)
/// /auth/refresh                   refresh (public)
/// /auth/logout                    logout (requires auth)
///
/// /users/create                   account creation request (public)
/// /users/activate                 account activation (public)
/// /users/recover                  password recovery request (public)
/// /users/reset-password           password reset (public)
/// /users/me                       current user
/// /users, /users/{id}             user administration
///
/// /groups, /groups/{id}           groups
/// /groups/membership              single membership add/remove
/// /groups/batch-membership        membership add/remove by email
///
/// /schools, /schools/{id}         schools
///
/// /feed/news                      published news
/// /feed/admin/news                moderation
///
/// /sdec_facturation/*             print shop invoicing
/// /raid/*                         raid registration
/// /competition/*                  sport competition
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/groups", groups::router())
        .nest("/schools", schools::router())
        .nest("/feed", feed::router())
        .nest("/sdec_facturation", sdec_facturation::router())
        .nest("/raid", raid::router())
        .nest("/competition", competition::router())
}
