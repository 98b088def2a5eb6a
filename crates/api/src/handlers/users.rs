//! Handlers for the `/users` resource: account creation and activation,
//! password recovery, profile reads and updates.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, NaiveDate, Utc};
use hyperion_core::error::CoreError;
use hyperion_core::groups::{account_type_group, validate_account_type};
use hyperion_core::schools::SCHOOL_NO_SCHOOL;
use hyperion_core::search::{
    clamp_limit, clamp_offset, like_pattern, DEFAULT_PAGE_LIMIT, DEFAULT_USER_SEARCH_LIMIT,
    MAX_PAGE_LIMIT,
};
use hyperion_core::types::DbId;
use hyperion_core::users::{
    email_matches, generate_token, resolve_account_type, ACTIVATION_TOKEN_TTL_HOURS,
    MIN_PASSWORD_LENGTH, RESET_TOKEN_TTL_HOURS, TOKEN_LENGTH,
};
use hyperion_db::models::user::{
    CreateUnconfirmedUser, CreateUser, UpdateCurrentUser, UpdateUser,
};
use hyperion_db::repositories::{
    MembershipRepo, RecoverRequestRepo, SchoolRepo, SessionRepo, UnconfirmedUserRepo, UserRepo,
};
use hyperion_db::TransactionalSession;
use hyperion_events::MailKind;
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::handlers::{mail_context, send_mail};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAccountRequest {
    #[validate(email)]
    pub email: String,
    pub account_type: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ActivateAccountRequest {
    pub activation_token: String,
    pub password: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    pub firstname: String,
    pub nickname: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub phone: Option<String>,
    pub promo: Option<i32>,
    pub floor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecoverRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub reset_token: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Query parameters for `GET /users/`.
///
/// `account_types` is a comma-separated list.
#[derive(Debug, Deserialize)]
pub struct UserListParams {
    pub account_types: Option<String>,
    pub group_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UserSearchParams {
    pub query: String,
}

fn hash(password: &str) -> AppResult<String> {
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

// ---------------------------------------------------------------------------
// Account creation
// ---------------------------------------------------------------------------

/// Pick the school whose email pattern matches `email`.
///
/// Returns the placeholder school and `false` when no school matches.
async fn school_for_email(state: &AppState, email: &str) -> AppResult<(DbId, bool)> {
    for school in SchoolRepo::list(&state.pool).await? {
        if school.id == SCHOOL_NO_SCHOOL {
            continue;
        }
        if email_matches(&school.email_regex, email)? {
            return Ok((school.id, true));
        }
    }
    Ok((SCHOOL_NO_SCHOOL, false))
}

/// POST /api/v1/users/create
///
/// Record an account request and email its activation token. The answer is
/// the same whether or not the address already has an account.
pub async fn create_account(
    State(state): State<AppState>,
    Json(input): Json<CreateAccountRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let email = input.email.to_lowercase();
    if let Some(account_type) = &input.account_type {
        validate_account_type(account_type).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    }

    let response = (
        StatusCode::CREATED,
        Json(DataResponse {
            data: MessageResponse {
                message: "An activation email has been sent",
            },
        }),
    );

    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        send_mail(&state, &email, MailKind::AccountExists, &mail_context(&state)).await;
        return Ok(response);
    }

    let (school_id, matches_school) = school_for_email(&state, &email).await?;
    // A specific account type is only granted to addresses of a known school.
    let requested = input.account_type.as_deref().filter(|_| matches_school);
    let account_type = resolve_account_type(requested, matches_school).to_string();

    let activation_token = generate_token(TOKEN_LENGTH);
    UnconfirmedUserRepo::create(
        &state.pool,
        &CreateUnconfirmedUser {
            email: email.clone(),
            account_type: account_type.clone(),
            school_id,
            activation_token: activation_token.clone(),
            expire_on: Utc::now() + Duration::hours(ACTIVATION_TOKEN_TTL_HOURS),
        },
    )
    .await?;

    tracing::info!(%school_id, account_type = %account_type, "Account creation requested");

    let mut context = mail_context(&state);
    context.insert("activation_token", &activation_token);
    context.insert("ttl_hours", &ACTIVATION_TOKEN_TTL_HOURS);
    send_mail(&state, &email, MailKind::AccountActivation, &context).await;

    Ok(response)
}

/// POST /api/v1/users/activate
///
/// Turn an account request into a user. The user, its account type
/// membership and the cleanup of pending requests share one transaction.
pub async fn activate_account(
    State(state): State<AppState>,
    Json(input): Json<ActivateAccountRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let pending = UnconfirmedUserRepo::find_by_token(&state.pool, &input.activation_token)
        .await?
        .ok_or_else(|| CoreError::not_found("Activation token", &input.activation_token))?;

    if pending.expire_on < Utc::now() {
        return Err(AppError::Core(CoreError::Validation(
            "Expired activation token".into(),
        )));
    }
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH).map_err(AppError::validation)?;
    let password_hash = hash(&input.password)?;

    let mut session = TransactionalSession::begin(&state.pool).await?;

    if UserRepo::find_by_email(&mut *session, &pending.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Validation(
            "An account already exists for this email".into(),
        )));
    }

    let user = UserRepo::create(
        &mut *session,
        &CreateUser {
            email: pending.email.clone(),
            school_id: pending.school_id,
            password_hash,
            account_type: pending.account_type.clone(),
            name: input.name,
            firstname: input.firstname,
            nickname: input.nickname,
            birthday: input.birthday,
            promo: input.promo,
            phone: input.phone,
            floor: input.floor,
        },
    )
    .await?;

    let group_id = account_type_group(&user.account_type).ok_or_else(|| {
        CoreError::Integrity(format!(
            "Account type '{}' has no matching group",
            user.account_type
        ))
    })?;
    MembershipRepo::create_if_missing(&mut *session, user.id, group_id).await?;

    let removed = UnconfirmedUserRepo::delete_by_email(&mut *session, &user.email).await?;
    session.finish().await?;

    tracing::info!(user_id = %user.id, removed, "Account activated");

    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

// ---------------------------------------------------------------------------
// Password recovery
// ---------------------------------------------------------------------------

/// POST /api/v1/users/recover
///
/// Email a password reset token. Unknown addresses get the same answer.
pub async fn recover(
    State(state): State<AppState>,
    Json(input): Json<RecoverRequest>,
) -> AppResult<impl IntoResponse> {
    let email = input.email.trim().to_lowercase();

    if let Some(user) = UserRepo::find_by_email(&state.pool, &email).await? {
        let reset_token = generate_token(TOKEN_LENGTH);
        RecoverRequestRepo::upsert(
            &state.pool,
            user.id,
            &reset_token,
            Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS),
        )
        .await?;

        let mut context = mail_context(&state);
        context.insert("reset_token", &reset_token);
        context.insert("ttl_hours", &RESET_TOKEN_TTL_HOURS);
        send_mail(&state, &user.email, MailKind::ResetPassword, &context).await;
    }

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: MessageResponse {
                message: "A reset email has been sent if the account exists",
            },
        }),
    ))
}

/// POST /api/v1/users/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<impl IntoResponse> {
    let request = RecoverRequestRepo::find_by_token(&state.pool, &input.reset_token)
        .await?
        .ok_or_else(|| CoreError::not_found("Reset token", &input.reset_token))?;

    if request.expire_on < Utc::now() {
        return Err(AppError::Core(CoreError::Validation(
            "Expired reset token".into(),
        )));
    }
    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::validation)?;
    let password_hash = hash(&input.new_password)?;

    let mut session = TransactionalSession::begin(&state.pool).await?;
    UserRepo::update_password(&mut *session, request.user_id, &password_hash).await?;
    RecoverRequestRepo::delete_for_user(&mut *session, request.user_id).await?;
    SessionRepo::revoke_all_for_user(&mut *session, request.user_id).await?;
    session.finish().await?;

    tracing::info!(user_id = %request.user_id, "Password reset");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/users/change-password
pub async fn change_password(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", auth.user_id))?;

    let valid = verify_password(&input.old_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !valid {
        return Err(AppError::Core(CoreError::Forbidden(
            "The old password is invalid".into(),
        )));
    }
    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::validation)?;

    UserRepo::update_password(&state.pool, user.id, &hash(&input.new_password)?).await?;

    tracing::info!(user_id = %user.id, "Password changed");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

/// GET /api/v1/users/me
pub async fn get_me(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", auth.user_id))?;
    Ok(Json(DataResponse { data: user }))
}

/// PATCH /api/v1/users/me
///
/// Users may only change their nickname, birthday, phone and floor.
pub async fn update_me(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateCurrentUser>,
) -> AppResult<impl IntoResponse> {
    let update = UpdateUser::from(input);
    let user = UserRepo::update(&state.pool, auth.user_id, &update)
        .await?
        .ok_or_else(|| CoreError::not_found("User", auth.user_id))?;
    Ok(Json(DataResponse { data: user }))
}

/// GET /api/v1/users
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<UserListParams>,
) -> AppResult<impl IntoResponse> {
    let account_types: Option<Vec<String>> = params.account_types.as_deref().map(|raw| {
        raw.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    });
    if let Some(types) = &account_types {
        for account_type in types {
            validate_account_type(account_type)
                .map_err(|e| AppError::Core(CoreError::Validation(e)))?;
        }
    }

    let users = UserRepo::list(
        &state.pool,
        account_types.as_deref(),
        params.group_id,
        clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
        clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse { data: users }))
}

/// GET /api/v1/users/search?query=
pub async fn search_users(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<UserSearchParams>,
) -> AppResult<impl IntoResponse> {
    let users = UserRepo::search(
        &state.pool,
        &like_pattern(&params.query),
        DEFAULT_USER_SEARCH_LIMIT,
    )
    .await?;
    Ok(Json(DataResponse { data: users }))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", user_id))?;
    Ok(Json(DataResponse { data: user }))
}

/// PATCH /api/v1/users/{id}
pub async fn update_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<impl IntoResponse> {
    if let Some(account_type) = &input.account_type {
        validate_account_type(account_type).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    }
    if let Some(school_id) = input.school_id {
        SchoolRepo::find_by_id(&state.pool, school_id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Validation(format!("Unknown school {school_id}")))
            })?;
    }

    let user = UserRepo::update(&state.pool, user_id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("User", user_id))?;

    tracing::info!(user_id = %user.id, admin_id = %admin.user_id, "User updated");

    Ok(Json(DataResponse { data: user }))
}

/// DELETE /api/v1/users/{id}
pub async fn delete_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut session = TransactionalSession::begin(&state.pool).await?;
    if !UserRepo::delete(&mut session, user_id).await? {
        return Err(AppError::Core(CoreError::not_found("User", user_id)));
    }
    session.finish().await?;

    tracing::warn!(
        target: "security",
        user_id = %user_id,
        admin_id = %admin.user_id,
        request_id = admin.request_id.as_deref().unwrap_or("-"),
        "User deleted",
    );

    Ok(StatusCode::NO_CONTENT)
}
