//! Handlers for the sport competition module (`/competition`).
//!
//! Participants register per sport for the active edition, optionally into
//! one of their school's teams. Per-school quotas bound how many students
//! and teams a school enters in each sport. Licence numbers are checked
//! against the FFSU register with the participant's school `ffsu_id`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hyperion_core::competition::{
    is_team_sport, team_has_room, validate_quota, validate_sport, within_quota,
};
use hyperion_core::error::CoreError;
use hyperion_core::groups::{GROUP_ADMIN, GROUP_COMPETITION_ADMIN};
use hyperion_core::types::DbId;
use hyperion_db::models::competition::{
    CreateCompetitionParticipant, CreateCompetitionTeam, CreateEdition, CreateSport, Edition,
    SchoolExtension, SetSportQuota, Sport, UpdateSport,
};
use hyperion_db::repositories::{
    CompetitionParticipantRepo, CompetitionTeamRepo, EditionRepo, SchoolExtensionRepo,
    SchoolRepo, SportQuotaRepo, SportRepo, UserRepo,
};
use hyperion_db::TransactionalSession;
use serde::Deserialize;
use sqlx::PgExecutor;

use crate::clients::ffsu::FfsuClient;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{is_member_of_any, RequireCompetitionAdmin};
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

const COMPETITION_ADMIN_GROUPS: &[DbId] = &[GROUP_COMPETITION_ADMIN, GROUP_ADMIN];

#[derive(Debug, Deserialize)]
pub struct SchoolExtensionRequest {
    #[serde(default)]
    pub from_lyon: bool,
    #[serde(default = "default_activated")]
    pub activated: bool,
    pub ffsu_id: Option<String>,
}

fn default_activated() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct LicenseValidityRequest {
    pub is_license_valid: bool,
}

async fn active_edition(executor: impl PgExecutor<'_>) -> AppResult<Edition> {
    EditionRepo::find_active(executor)
        .await?
        .ok_or_else(|| CoreError::not_found("Edition", "active").into())
}

async fn active_sport(executor: impl PgExecutor<'_>, sport_id: DbId) -> AppResult<Sport> {
    SportRepo::find_by_id(executor, sport_id)
        .await?
        .filter(|sport| sport.activated)
        .ok_or_else(|| CoreError::not_found("Sport", sport_id).into())
}

async fn active_school(
    executor: impl PgExecutor<'_>,
    school_id: DbId,
) -> AppResult<SchoolExtension> {
    SchoolExtensionRepo::find_by_school(executor, school_id)
        .await?
        .filter(|extension| extension.activated)
        .ok_or_else(|| CoreError::not_found("School", school_id).into())
}

// ---------------------------------------------------------------------------
// Editions
// ---------------------------------------------------------------------------

/// GET /api/v1/competition/editions
pub async fn list_editions(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let editions = EditionRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: editions }))
}

/// GET /api/v1/competition/editions/active
pub async fn get_active_edition(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let edition = active_edition(&state.pool).await?;
    Ok(Json(DataResponse { data: edition }))
}

/// POST /api/v1/competition/editions
pub async fn create_edition(
    RequireCompetitionAdmin(_admin): RequireCompetitionAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateEdition>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Edition name must not be empty".into(),
        )));
    }
    if input.start_date > input.end_date {
        return Err(AppError::Core(CoreError::Validation(
            "start_date must not be after end_date".into(),
        )));
    }
    let edition = EditionRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: edition })))
}

/// POST /api/v1/competition/editions/{edition_id}/activate
///
/// Activates the edition and deactivates every other one.
pub async fn activate_edition(
    RequireCompetitionAdmin(admin): RequireCompetitionAdmin,
    State(state): State<AppState>,
    Path(edition_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut session = TransactionalSession::begin(&state.pool).await?;
    let edition = EditionRepo::activate(&mut session, edition_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Edition", edition_id))?;
    session.finish().await?;

    tracing::info!(edition_id = %edition_id, admin_id = %admin.user_id, "Competition edition activated");

    Ok(Json(DataResponse { data: edition }))
}

// ---------------------------------------------------------------------------
// Sports
// ---------------------------------------------------------------------------

/// GET /api/v1/competition/sports
pub async fn list_sports(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let sports = SportRepo::list(&state.pool, params.include_inactive).await?;
    Ok(Json(DataResponse { data: sports }))
}

/// POST /api/v1/competition/sports
pub async fn create_sport(
    RequireCompetitionAdmin(_admin): RequireCompetitionAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateSport>,
) -> AppResult<impl IntoResponse> {
    validate_sport(
        &input.name,
        input.team_size,
        input.substitute_max,
        input.category.as_deref(),
    )?;
    let sport = SportRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: sport })))
}

/// PATCH /api/v1/competition/sports/{sport_id}
pub async fn update_sport(
    RequireCompetitionAdmin(_admin): RequireCompetitionAdmin,
    State(state): State<AppState>,
    Path(sport_id): Path<DbId>,
    Json(input): Json<UpdateSport>,
) -> AppResult<impl IntoResponse> {
    let current = SportRepo::find_by_id(&state.pool, sport_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Sport", sport_id))?;
    validate_sport(
        input.name.as_deref().unwrap_or(&current.name),
        input.team_size.unwrap_or(current.team_size),
        input.substitute_max.or(current.substitute_max),
        input.category.as_deref().or(current.category.as_deref()),
    )?;

    let sport = SportRepo::update(&state.pool, sport_id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Sport", sport_id))?;
    Ok(Json(DataResponse { data: sport }))
}

/// DELETE /api/v1/competition/sports/{sport_id}
pub async fn delete_sport(
    RequireCompetitionAdmin(_admin): RequireCompetitionAdmin,
    State(state): State<AppState>,
    Path(sport_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !SportRepo::delete(&state.pool, sport_id).await? {
        return Err(AppError::Core(CoreError::not_found("Sport", sport_id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// School extensions
// ---------------------------------------------------------------------------

/// GET /api/v1/competition/schools
pub async fn list_school_extensions(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let extensions = SchoolExtensionRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: extensions }))
}

/// PUT /api/v1/competition/schools/{school_id}
pub async fn upsert_school_extension(
    RequireCompetitionAdmin(_admin): RequireCompetitionAdmin,
    State(state): State<AppState>,
    Path(school_id): Path<DbId>,
    Json(input): Json<SchoolExtensionRequest>,
) -> AppResult<impl IntoResponse> {
    SchoolRepo::find_by_id(&state.pool, school_id)
        .await?
        .ok_or_else(|| CoreError::not_found("School", school_id))?;

    let extension = SchoolExtensionRepo::upsert(
        &state.pool,
        &SchoolExtension {
            school_id,
            from_lyon: input.from_lyon,
            activated: input.activated,
            ffsu_id: input.ffsu_id,
        },
    )
    .await?;
    Ok(Json(DataResponse { data: extension }))
}

// ---------------------------------------------------------------------------
// Sport quotas
// ---------------------------------------------------------------------------

/// GET /api/v1/competition/schools/{school_id}/sports/{sport_id}/quotas
pub async fn get_sport_quota(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path((school_id, sport_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let edition = active_edition(&state.pool).await?;
    let quota = SportQuotaRepo::find(&state.pool, school_id, sport_id, edition.id)
        .await?
        .ok_or_else(|| CoreError::not_found("Quota", format!("{school_id}/{sport_id}")))?;
    Ok(Json(DataResponse { data: quota }))
}

/// PUT /api/v1/competition/schools/{school_id}/sports/{sport_id}/quotas
///
/// Set both quotas of a school for a sport in the active edition. An
/// omitted quota is unlimited.
pub async fn set_sport_quota(
    RequireCompetitionAdmin(admin): RequireCompetitionAdmin,
    State(state): State<AppState>,
    Path((school_id, sport_id)): Path<(DbId, DbId)>,
    Json(input): Json<SetSportQuota>,
) -> AppResult<impl IntoResponse> {
    validate_quota(input.participant_quota, input.team_quota)?;

    let mut session = TransactionalSession::begin(&state.pool).await?;
    active_school(&mut *session, school_id).await?;
    SportRepo::find_by_id(&mut *session, sport_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Sport", sport_id))?;
    let edition = active_edition(&mut *session).await?;
    let quota =
        SportQuotaRepo::upsert(&mut *session, school_id, sport_id, edition.id, &input).await?;
    session.finish().await?;

    tracing::info!(
        school_id = %school_id,
        sport_id = %sport_id,
        participant_quota = ?quota.participant_quota,
        team_quota = ?quota.team_quota,
        admin_id = %admin.user_id,
        "Sport quota set",
    );

    Ok(Json(DataResponse { data: quota }))
}

/// DELETE /api/v1/competition/schools/{school_id}/sports/{sport_id}/quotas
pub async fn delete_sport_quota(
    RequireCompetitionAdmin(_admin): RequireCompetitionAdmin,
    State(state): State<AppState>,
    Path((school_id, sport_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let edition = active_edition(&state.pool).await?;
    if !SportQuotaRepo::delete(&state.pool, school_id, sport_id, edition.id).await? {
        return Err(AppError::Core(CoreError::not_found(
            "Quota",
            format!("{school_id}/{sport_id}"),
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

/// POST /api/v1/competition/teams
///
/// Enter a school team in a team sport. Students may only create a team of
/// their own school that they captain; competition admins create any.
pub async fn create_team(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCompetitionTeam>,
) -> AppResult<impl IntoResponse> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Team name must not be empty"));
    }
    let captain_id = input.captain_id.unwrap_or(auth.user_id);
    let is_admin = is_member_of_any(&state, auth.user_id, COMPETITION_ADMIN_GROUPS).await?;

    let mut session = TransactionalSession::begin(&state.pool).await?;
    let sport = active_sport(&mut *session, input.sport_id).await?;
    if !is_team_sport(sport.team_size) {
        return Err(AppError::validation("This sport is played individually"));
    }
    active_school(&mut *session, input.school_id).await?;
    let edition = active_edition(&mut *session).await?;

    let captain = UserRepo::find_by_id(&mut *session, captain_id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", captain_id))?;
    if !is_admin && captain.id != auth.user_id {
        return Err(AppError::forbidden("You can only create a team you captain"));
    }
    if captain.school_id != input.school_id {
        return Err(AppError::validation("The captain must study in the team's school"));
    }

    let quota =
        SportQuotaRepo::find_for_update(&mut *session, input.school_id, sport.id, edition.id)
            .await?;
    if let Some(team_quota) = quota.and_then(|quota| quota.team_quota) {
        let teams = CompetitionTeamRepo::count_for_school(
            &mut *session,
            input.school_id,
            sport.id,
            edition.id,
        )
        .await?;
        if !within_quota(teams, Some(team_quota)) {
            return Err(AppError::validation(
                "This school has reached its team quota for this sport",
            ));
        }
    }

    let team = CompetitionTeamRepo::create(
        &mut *session,
        edition.id,
        input.school_id,
        sport.id,
        name,
        captain.id,
    )
    .await?;
    session.finish().await?;

    tracing::info!(
        team_id = %team.id,
        sport_id = %sport.id,
        school_id = %team.school_id,
        "Competition team created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: team })))
}

/// GET /api/v1/competition/teams/sports/{sport_id}
pub async fn list_sport_teams(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(sport_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let edition = active_edition(&state.pool).await?;
    let teams = CompetitionTeamRepo::list_for_sport(&state.pool, sport_id, edition.id).await?;
    Ok(Json(DataResponse { data: teams }))
}

/// GET /api/v1/competition/teams/schools/{school_id}
pub async fn list_school_teams(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(school_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let edition = active_edition(&state.pool).await?;
    let teams = CompetitionTeamRepo::list_for_school(&state.pool, school_id, edition.id).await?;
    Ok(Json(DataResponse { data: teams }))
}

/// DELETE /api/v1/competition/teams/{team_id}
///
/// Allowed to the captain and competition admins. Members stay registered
/// without a team.
pub async fn delete_team(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(team_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let team = CompetitionTeamRepo::find_by_id(&state.pool, team_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Team", team_id))?;
    if team.captain_id != auth.user_id
        && !is_member_of_any(&state, auth.user_id, COMPETITION_ADMIN_GROUPS).await?
    {
        return Err(AppError::forbidden("Only the captain can delete this team"));
    }
    if !CompetitionTeamRepo::delete(&state.pool, team_id).await? {
        return Err(AppError::Core(CoreError::not_found("Team", team_id)));
    }

    tracing::info!(team_id = %team_id, user_id = %auth.user_id, "Competition team deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Participants
// ---------------------------------------------------------------------------

/// POST /api/v1/competition/participants/sports/{sport_id}
///
/// Register the current user for a sport in the active edition.
pub async fn register_participant(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(sport_id): Path<DbId>,
    Json(input): Json<CreateCompetitionParticipant>,
) -> AppResult<impl IntoResponse> {
    let mut session = TransactionalSession::begin(&state.pool).await?;

    let sport = active_sport(&mut *session, sport_id).await?;
    let edition = active_edition(&mut *session).await?;
    let user = UserRepo::find_by_id(&mut *session, auth.user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", auth.user_id))?;

    if CompetitionParticipantRepo::find(&mut *session, auth.user_id, sport.id, edition.id)
        .await?
        .is_some()
    {
        return Err(AppError::validation("You are already registered for this sport"));
    }

    let quota =
        SportQuotaRepo::find_for_update(&mut *session, user.school_id, sport.id, edition.id)
            .await?;
    if let Some(participant_quota) = quota.and_then(|quota| quota.participant_quota) {
        let registered = CompetitionParticipantRepo::count_for_school(
            &mut *session,
            user.school_id,
            sport.id,
            edition.id,
        )
        .await?;
        if !within_quota(registered, Some(participant_quota)) {
            return Err(AppError::validation(
                "Your school has reached its participant quota for this sport",
            ));
        }
    }

    if let Some(team_id) = input.team_id {
        let team = CompetitionTeamRepo::find_for_update(&mut *session, team_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Team", team_id))?;
        if team.sport_id != sport.id || team.edition_id != edition.id {
            return Err(AppError::validation("This team does not play this sport"));
        }
        if team.school_id != user.school_id {
            return Err(AppError::forbidden("This team belongs to another school"));
        }
        let (players, substitutes) =
            CompetitionParticipantRepo::count_in_team(&mut *session, team.id).await?;
        if !team_has_room(
            sport.team_size,
            sport.substitute_max,
            players,
            substitutes,
            input.substitute,
        ) {
            return Err(AppError::validation("This team is full"));
        }
    }

    let participant =
        CompetitionParticipantRepo::create(&mut *session, auth.user_id, sport.id, edition.id, &input)
            .await?;
    session.finish().await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: participant })))
}

/// GET /api/v1/competition/participants/sports/{sport_id}
pub async fn list_sport_participants(
    RequireCompetitionAdmin(_admin): RequireCompetitionAdmin,
    State(state): State<AppState>,
    Path(sport_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let edition = active_edition(&state.pool).await?;
    let participants =
        CompetitionParticipantRepo::list_for_sport(&state.pool, sport_id, edition.id).await?;
    Ok(Json(DataResponse { data: participants }))
}

/// DELETE /api/v1/competition/participants/sports/{sport_id}
///
/// Withdraw the current user from a sport.
pub async fn withdraw_participant(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(sport_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let edition = active_edition(&state.pool).await?;
    if !CompetitionParticipantRepo::delete(&state.pool, auth.user_id, sport_id, edition.id).await? {
        return Err(AppError::Core(CoreError::not_found("Participant", auth.user_id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/competition/participants/sports/{sport_id}/users/{user_id}/license
pub async fn set_license_validity(
    RequireCompetitionAdmin(admin): RequireCompetitionAdmin,
    State(state): State<AppState>,
    Path((sport_id, user_id)): Path<(DbId, DbId)>,
    Json(input): Json<LicenseValidityRequest>,
) -> AppResult<impl IntoResponse> {
    let edition = active_edition(&state.pool).await?;
    let participant = CompetitionParticipantRepo::set_license_validity(
        &state.pool,
        user_id,
        sport_id,
        edition.id,
        input.is_license_valid,
    )
    .await?
    .ok_or_else(|| CoreError::not_found("Participant", user_id))?;

    tracing::info!(
        user_id = %user_id,
        sport_id = %sport_id,
        is_license_valid = input.is_license_valid,
        admin_id = %admin.user_id,
        "Licence validity set manually",
    );

    Ok(Json(DataResponse { data: participant }))
}

/// POST /api/v1/competition/participants/sports/{sport_id}/users/{user_id}/license/check
///
/// Look the participant's licence up in the FFSU register and store the
/// outcome. An unreachable register marks the licence invalid.
pub async fn check_license(
    RequireCompetitionAdmin(admin): RequireCompetitionAdmin,
    State(state): State<AppState>,
    Path((sport_id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let edition = active_edition(&state.pool).await?;
    let participant = CompetitionParticipantRepo::find(&state.pool, user_id, sport_id, edition.id)
        .await?
        .ok_or_else(|| CoreError::not_found("Participant", user_id))?;
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", user_id))?;
    let ffsu_id = SchoolExtensionRepo::find_by_school(&state.pool, user.school_id)
        .await?
        .and_then(|extension| extension.ffsu_id)
        .ok_or_else(|| {
            CoreError::Validation("The participant's school has no FFSU id".into())
        })?;

    let is_valid = match participant.license.as_deref() {
        Some(license) => {
            let client = FfsuClient::with_client(state.http.clone(), state.config.ffsu_url.clone());
            client
                .check_license(&ffsu_id, &user.name, &user.firstname, license)
                .await
        }
        None => false,
    };

    let participant = CompetitionParticipantRepo::set_license_validity(
        &state.pool,
        user_id,
        sport_id,
        edition.id,
        is_valid,
    )
    .await?
    .ok_or_else(|| CoreError::not_found("Participant", user_id))?;

    tracing::info!(
        user_id = %user_id,
        sport_id = %sport_id,
        is_license_valid = is_valid,
        admin_id = %admin.user_id,
        "Licence checked against the FFSU register",
    );

    Ok(Json(DataResponse { data: participant }))
}
