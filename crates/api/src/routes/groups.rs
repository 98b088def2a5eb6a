//! Route definitions for the `/groups` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::groups;
use crate::state::AppState;

/// Routes mounted at `/groups`.
///
/// ```text
/// GET    /                  -> list_groups
/// POST   /                  -> create_group (admin)
/// GET    /{id}              -> get_group (admin)
/// PATCH  /{id}              -> update_group (admin)
/// DELETE /{id}              -> delete_group (admin)
/// POST   /membership        -> create_membership (admin)
/// DELETE /membership        -> delete_membership (admin)
/// POST   /batch-membership  -> create_batch_membership (admin)
/// DELETE /batch-membership  -> delete_batch_membership (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(groups::list_groups).post(groups::create_group))
        .route(
            "/membership",
            post(groups::create_membership).delete(groups::delete_membership),
        )
        .route(
            "/batch-membership",
            post(groups::create_batch_membership).delete(groups::delete_batch_membership),
        )
        .route(
            "/{id}",
            get(groups::get_group)
                .patch(groups::update_group)
                .delete(groups::delete_group),
        )
}
