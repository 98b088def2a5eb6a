//! Handlers for the `/schools` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hyperion_core::error::CoreError;
use hyperion_core::schools::is_base_school;
use hyperion_core::types::DbId;
use hyperion_core::users::validate_email_regex;
use hyperion_db::models::school::{CreateSchool, UpdateSchool};
use hyperion_db::repositories::SchoolRepo;
use hyperion_db::TransactionalSession;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

async fn ensure_name_free(state: &AppState, name: &str, current: Option<DbId>) -> AppResult<()> {
    if let Some(existing) = SchoolRepo::find_by_name(&state.pool, name).await? {
        if Some(existing.id) != current {
            return Err(AppError::Core(CoreError::Validation(format!(
                "A school named '{name}' already exists"
            ))));
        }
    }
    Ok(())
}

/// GET /api/v1/schools
pub async fn list_schools(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let schools = SchoolRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: schools }))
}

/// GET /api/v1/schools/{id}
pub async fn get_school(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(school_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let school = SchoolRepo::find_by_id(&state.pool, school_id)
        .await?
        .ok_or_else(|| CoreError::not_found("School", school_id))?;
    Ok(Json(DataResponse { data: school }))
}

/// POST /api/v1/schools
pub async fn create_school(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateSchool>,
) -> AppResult<impl IntoResponse> {
    validate_email_regex(&input.email_regex)?;
    ensure_name_free(&state, &input.name, None).await?;

    let school = SchoolRepo::create(&state.pool, &input).await?;

    tracing::info!(school_id = %school.id, admin_id = %admin.user_id, "School created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: school })))
}

/// PATCH /api/v1/schools/{id}
pub async fn update_school(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(school_id): Path<DbId>,
    Json(input): Json<UpdateSchool>,
) -> AppResult<impl IntoResponse> {
    if let Some(pattern) = &input.email_regex {
        validate_email_regex(pattern)?;
    }
    if let Some(name) = &input.name {
        ensure_name_free(&state, name, Some(school_id)).await?;
    }

    let school = SchoolRepo::update(&state.pool, school_id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("School", school_id))?;

    tracing::info!(%school_id, admin_id = %admin.user_id, "School updated");

    Ok(Json(DataResponse { data: school }))
}

/// DELETE /api/v1/schools/{id}
///
/// Users of the school are moved to the placeholder school.
pub async fn delete_school(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(school_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if is_base_school(school_id) {
        return Err(AppError::Core(CoreError::Validation(
            "This school is a base school and cannot be deleted".into(),
        )));
    }

    let mut session = TransactionalSession::begin(&state.pool).await?;
    if !SchoolRepo::delete(&mut session, school_id).await? {
        return Err(AppError::Core(CoreError::not_found("School", school_id)));
    }
    session.finish().await?;

    tracing::info!(%school_id, admin_id = %admin.user_id, "School deleted");

    Ok(StatusCode::NO_CONTENT)
}
