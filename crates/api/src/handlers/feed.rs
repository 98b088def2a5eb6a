//! Handlers for the `/feed` resource, plus the operations other modules
//! use to publish and withdraw their news.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use hyperion_core::error::CoreError;
use hyperion_core::feed::{
    initial_status, validate_moderation, validate_news, validate_news_status,
    NEWS_PUBLISHED, NEWS_REJECTED, NEWS_WAITING_APPROVAL,
    VALID_NEWS_STATUSES,
};
use hyperion_core::search::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use hyperion_core::types::{DbId, Timestamp};
use hyperion_db::models::news::{CreateNews, News};
use hyperion_db::repositories::NewsRepo;
use hyperion_events::{EventBus, HyperionEvent};
use serde::Deserialize;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireEclMember, RequireFeedAdmin};
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Module name recorded on news created directly by feed admins.
pub const FEED_MODULE: &str = "feed";

// ---------------------------------------------------------------------------
// Operations shared with other modules
// ---------------------------------------------------------------------------

/// Store a news in the feed.
///
/// With `require_feed_admin_approval` the news waits for a feed admin and a
/// [`HyperionEvent::NewsPendingApproval`] is published; otherwise it is
/// published immediately.
pub async fn create_feed_news(
    executor: impl PgExecutor<'_>,
    event_bus: &EventBus,
    input: &CreateNews,
    require_feed_admin_approval: bool,
    actor: Option<DbId>,
) -> AppResult<News> {
    validate_news(&input.title, input.start, input.end)?;

    let status = initial_status(require_feed_admin_approval);
    let news = NewsRepo::create(executor, input, status).await?;

    if status == NEWS_WAITING_APPROVAL {
        event_bus.publish(HyperionEvent::NewsPendingApproval {
            news_id: news.id,
            module: news.module.clone(),
            entity: news.entity.clone(),
            title: news.title.clone(),
            submitted_by: actor,
        });
    }

    tracing::info!(news_id = %news.id, module = %news.module, status, "Feed news created");

    Ok(news)
}

/// Withdraw every news a module published for one of its objects.
pub async fn delete_news_by_module_object(
    executor: impl PgExecutor<'_>,
    module: &str,
    module_object_id: DbId,
) -> AppResult<u64> {
    let removed = NewsRepo::delete_by_module_object(executor, module, module_object_id).await?;
    tracing::info!(module, %module_object_id, removed, "Feed news withdrawn");
    Ok(removed)
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Body of `POST /feed/admin/news`, for entities without a module.
#[derive(Debug, Deserialize)]
pub struct AdminCreateNewsRequest {
    pub title: String,
    pub start: Timestamp,
    pub end: Option<Timestamp>,
    pub entity: String,
    pub location: Option<String>,
    pub action_start: Option<Timestamp>,
    pub image_folder: Option<String>,
    pub image_id: Option<DbId>,
    #[serde(default)]
    pub require_feed_admin_approval: bool,
}

/// Query of `GET /feed/admin/news`. `status` is a comma-separated list.
#[derive(Debug, Deserialize)]
pub struct AdminNewsParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/feed/news
///
/// Published news that are still displayed.
pub async fn list_news(
    RequireEclMember(_user): RequireEclMember,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let news = NewsRepo::list_published(
        &state.pool,
        NEWS_PUBLISHED,
        Utc::now(),
        clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
        clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse { data: news }))
}

/// GET /api/v1/feed/admin/news?status=waiting_approval,rejected
pub async fn list_admin_news(
    RequireFeedAdmin(_admin): RequireFeedAdmin,
    State(state): State<AppState>,
    Query(params): Query<AdminNewsParams>,
) -> AppResult<impl IntoResponse> {
    let statuses: Vec<String> = match params.status.as_deref() {
        Some(raw) => raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => VALID_NEWS_STATUSES.iter().map(|s| s.to_string()).collect(),
    };
    for status in &statuses {
        validate_news_status(status)?;
    }

    let news = NewsRepo::list_by_statuses(
        &state.pool,
        &statuses,
        clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
        clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse { data: news }))
}

/// POST /api/v1/feed/admin/news
pub async fn create_admin_news(
    RequireFeedAdmin(admin): RequireFeedAdmin,
    State(state): State<AppState>,
    Json(input): Json<AdminCreateNewsRequest>,
) -> AppResult<impl IntoResponse> {
    let news_input = CreateNews {
        title: input.title,
        start: input.start,
        end: input.end,
        entity: input.entity,
        location: input.location,
        action_start: input.action_start,
        module: FEED_MODULE.to_string(),
        module_object_id: Uuid::new_v4(),
        image_folder: input.image_folder,
        image_id: input.image_id,
    };

    let news = create_feed_news(
        &state.pool,
        &state.event_bus,
        &news_input,
        input.require_feed_admin_approval,
        Some(admin.user_id),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: news })))
}

async fn moderate(state: &AppState, admin_id: DbId, news_id: DbId, target: &str) -> AppResult<News> {
    validate_moderation(target)?;
    let news = NewsRepo::update_status(&state.pool, news_id, target)
        .await?
        .ok_or_else(|| CoreError::not_found("News", news_id))?;

    tracing::info!(%news_id, admin_id = %admin_id, status = target, "Feed news moderated");
    Ok(news)
}

/// POST /api/v1/feed/admin/news/{id}/approve
pub async fn approve_news(
    RequireFeedAdmin(admin): RequireFeedAdmin,
    State(state): State<AppState>,
    Path(news_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let news = moderate(&state, admin.user_id, news_id, NEWS_PUBLISHED).await?;
    Ok(Json(DataResponse { data: news }))
}

/// POST /api/v1/feed/admin/news/{id}/reject
pub async fn reject_news(
    RequireFeedAdmin(admin): RequireFeedAdmin,
    State(state): State<AppState>,
    Path(news_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let news = moderate(&state, admin.user_id, news_id, NEWS_REJECTED).await?;
    Ok(Json(DataResponse { data: news }))
}

/// DELETE /api/v1/feed/admin/news/modules/{module}/{module_object_id}
pub async fn delete_module_news(
    RequireFeedAdmin(_admin): RequireFeedAdmin,
    State(state): State<AppState>,
    Path((module, module_object_id)): Path<(String, DbId)>,
) -> AppResult<impl IntoResponse> {
    let removed = delete_news_by_module_object(&state.pool, &module, module_object_id).await?;
    if removed == 0 {
        return Err(AppError::Core(CoreError::not_found(
            "News",
            format!("{module}/{module_object_id}"),
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}
