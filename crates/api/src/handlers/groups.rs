//! Handlers for the `/groups` resource and group memberships.
//!
//! Every membership change is logged on the `security` target with the
//! acting admin and the request id.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hyperion_core::error::CoreError;
use hyperion_core::groups::is_protected_group;
use hyperion_core::types::DbId;
use hyperion_db::models::group::{
    CreateGroup, CreateMembership, GroupWithMembers, UpdateGroup,
};
use hyperion_db::repositories::{GroupRepo, MembershipRepo, UserRepo};
use hyperion_db::TransactionalSession;
use serde::Deserialize;
use sqlx::PgExecutor;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireEclMember};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BatchMembershipRequest {
    pub group_id: DbId,
    pub user_emails: Vec<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteMembershipRequest {
    pub user_id: DbId,
    pub group_id: DbId,
}

#[derive(Debug, Deserialize)]
pub struct DeleteBatchMembershipRequest {
    pub group_id: DbId,
}

fn log_membership_change(admin: &AuthUser, action: &str, group_id: DbId, detail: &str) {
    tracing::warn!(
        target: "security",
        admin_id = %admin.user_id,
        request_id = admin.request_id.as_deref().unwrap_or("-"),
        %group_id,
        action,
        detail,
        "Group membership changed",
    );
}

async fn group_with_members(
    conn: &mut sqlx::PgConnection,
    group_id: DbId,
) -> AppResult<GroupWithMembers> {
    let group = GroupRepo::find_by_id(&mut *conn, group_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Group", group_id))?;
    let members = MembershipRepo::members(&mut *conn, group_id).await?;
    Ok(GroupWithMembers { group, members })
}

async fn ensure_name_free(
    executor: impl PgExecutor<'_>,
    name: &str,
    current: Option<DbId>,
) -> AppResult<()> {
    if let Some(existing) = GroupRepo::find_by_name(executor, name).await? {
        if Some(existing.id) != current {
            return Err(AppError::Core(CoreError::Validation(format!(
                "A group named '{name}' already exists"
            ))));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

/// GET /api/v1/groups
pub async fn list_groups(
    RequireEclMember(_user): RequireEclMember,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let groups = GroupRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: groups }))
}

/// GET /api/v1/groups/{id}
pub async fn get_group(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(group_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.pool.acquire().await?;
    let group = group_with_members(&mut conn, group_id).await?;
    Ok(Json(DataResponse { data: group }))
}

/// POST /api/v1/groups
pub async fn create_group(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateGroup>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Group name must not be empty".into(),
        )));
    }
    ensure_name_free(&state.pool, &input.name, None).await?;

    let group = GroupRepo::create(&state.pool, &input).await?;

    tracing::info!(group_id = %group.id, admin_id = %admin.user_id, "Group created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: group })))
}

/// PATCH /api/v1/groups/{id}
pub async fn update_group(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(group_id): Path<DbId>,
    Json(input): Json<UpdateGroup>,
) -> AppResult<impl IntoResponse> {
    GroupRepo::find_by_id(&state.pool, group_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Group", group_id))?;
    if let Some(name) = &input.name {
        ensure_name_free(&state.pool, name, Some(group_id)).await?;
    }

    let group = GroupRepo::update(&state.pool, group_id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Group", group_id))?;

    tracing::info!(%group_id, admin_id = %admin.user_id, "Group updated");

    Ok(Json(DataResponse { data: group }))
}

/// DELETE /api/v1/groups/{id}
///
/// Well-known groups cannot be deleted.
pub async fn delete_group(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(group_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if is_protected_group(group_id) {
        return Err(AppError::Core(CoreError::Validation(
            "This group is a base group and cannot be deleted".into(),
        )));
    }

    let mut session = TransactionalSession::begin(&state.pool).await?;
    if !GroupRepo::delete(&mut session, group_id).await? {
        return Err(AppError::Core(CoreError::not_found("Group", group_id)));
    }
    session.finish().await?;

    log_membership_change(&admin, "delete_group", group_id, "all memberships removed");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Memberships
// ---------------------------------------------------------------------------

/// POST /api/v1/groups/membership
///
/// Returns the group with its updated member list.
pub async fn create_membership(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateMembership>,
) -> AppResult<impl IntoResponse> {
    let mut session = TransactionalSession::begin(&state.pool).await?;

    if GroupRepo::find_by_id(&mut *session, input.group_id).await?.is_none() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown group {}",
            input.group_id
        ))));
    }
    if UserRepo::find_by_id(&mut *session, input.user_id).await?.is_none() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown user {}",
            input.user_id
        ))));
    }
    if MembershipRepo::exists(&mut *session, input.user_id, input.group_id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "The user is already a member of this group".into(),
        )));
    }

    MembershipRepo::create(&mut *session, &input).await?;
    let group = group_with_members(&mut session, input.group_id).await?;
    session.finish().await?;

    log_membership_change(
        &admin,
        "add",
        input.group_id,
        &format!("user {}", input.user_id),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: group })))
}

/// POST /api/v1/groups/batch-membership
///
/// Unknown emails and existing memberships are skipped.
pub async fn create_batch_membership(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<BatchMembershipRequest>,
) -> AppResult<impl IntoResponse> {
    let mut session = TransactionalSession::begin(&state.pool).await?;

    GroupRepo::find_by_id(&mut *session, input.group_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Group", input.group_id))?;

    let mut added = 0usize;
    for email in &input.user_emails {
        let Some(user) = UserRepo::find_by_email(&mut *session, email.trim()).await? else {
            tracing::debug!(email = %email, "Batch membership: unknown email skipped");
            continue;
        };
        if MembershipRepo::exists(&mut *session, user.id, input.group_id).await? {
            continue;
        }
        MembershipRepo::create(
            &mut *session,
            &CreateMembership {
                user_id: user.id,
                group_id: input.group_id,
                description: input.description.clone(),
            },
        )
        .await?;
        added += 1;
    }

    let group = group_with_members(&mut session, input.group_id).await?;
    session.finish().await?;

    log_membership_change(
        &admin,
        "batch_add",
        input.group_id,
        &format!("{added} of {} emails added", input.user_emails.len()),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: group })))
}

/// DELETE /api/v1/groups/membership
pub async fn delete_membership(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<DeleteMembershipRequest>,
) -> AppResult<impl IntoResponse> {
    if !MembershipRepo::delete(&state.pool, input.user_id, input.group_id).await? {
        return Err(AppError::Core(CoreError::not_found(
            "Membership",
            format!("{}/{}", input.user_id, input.group_id),
        )));
    }

    log_membership_change(
        &admin,
        "remove",
        input.group_id,
        &format!("user {}", input.user_id),
    );

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/groups/batch-membership
pub async fn delete_batch_membership(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<DeleteBatchMembershipRequest>,
) -> AppResult<impl IntoResponse> {
    let removed = MembershipRepo::delete_all_for_group(&state.pool, input.group_id).await?;

    log_membership_change(
        &admin,
        "batch_remove",
        input.group_id,
        &format!("{removed} memberships removed"),
    );

    Ok(StatusCode::NO_CONTENT)
}
