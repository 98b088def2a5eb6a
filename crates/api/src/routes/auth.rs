use axum::routing::post;
use axum::Router;

use crate::handlers::auth::{login, logout, refresh};
use crate::state::AppState;

/// `/auth`: token issuance and revocation. Only `logout` needs a token.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
}
