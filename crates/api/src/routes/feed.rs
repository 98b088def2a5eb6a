//! Route definitions for the `/feed` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::feed;
use crate::state::AppState;

/// Routes mounted at `/feed`.
///
/// ```text
/// GET    /news                                          -> list_news (ECL member)
/// GET    /admin/news                                    -> list_admin_news (feed admin)
/// POST   /admin/news                                    -> create_admin_news (feed admin)
/// POST   /admin/news/{id}/approve                       -> approve_news (feed admin)
/// POST   /admin/news/{id}/reject                        -> reject_news (feed admin)
/// DELETE /admin/news/modules/{module}/{module_object_id} -> delete_module_news (feed admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/news", get(feed::list_news))
        .route(
            "/admin/news",
            get(feed::list_admin_news).post(feed::create_admin_news),
        )
        .route("/admin/news/{id}/approve", post(feed::approve_news))
        .route("/admin/news/{id}/reject", post(feed::reject_news))
        .route(
            "/admin/news/modules/{module}/{module_object_id}",
            delete(feed::delete_module_news),
        )
}
