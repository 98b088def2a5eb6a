//! Handlers for raid registration (`/raid`).
//!
//! A participant row shares its id with the user who registered. Teams
//! hold a captain and an optional second. Every write that touches a
//! participant or a team refreshes the team's validation progress and,
//! once the team is complete, assigns its number.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{NaiveDate, Utc};
use hyperion_core::error::CoreError;
use hyperion_core::groups::{GROUP_ADMIN, GROUP_RAID_ADMIN};
use hyperion_core::raid::{
    difficulty_number_base, generate_invite_token, is_minor, is_team_validated, keep_if_equal,
    merged_team_name, merged_team_number, next_team_number, team_validation_progress,
    validate_difficulty, validate_document_type, validate_document_validation,
    validate_meeting_place, validate_size, ParticipantChecklist, RAID_INFORMATION_SCHEMA,
    SCHOOL_SITUATION_PREFIX, VALIDATION_ACCEPTED, VALIDATION_TEMPORARY,
};
use hyperion_core::types::DbId;
use hyperion_db::models::raid::{
    CreateDocument, CreateParticipant, CreateSecurityFile, CreateTeam, Participant,
    RaidInformation, Team, TeamDetail, UpdateParticipant, UpdateTeam,
};
use hyperion_db::repositories::{
    CoreDataRepo, InviteTokenRepo, RaidDocumentRepo, RaidParticipantRepo, RaidTeamRepo,
    SecurityFileRepo,
};
use hyperion_db::TransactionalSession;
use serde::Deserialize;
use sqlx::PgConnection;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{is_member_of_any, RequireRaidAdmin};
use crate::response::DataResponse;
use crate::state::AppState;

const RAID_ADMIN_GROUPS: &[DbId] = &[GROUP_RAID_ADMIN, GROUP_ADMIN];

#[derive(Debug, Deserialize)]
pub struct DocumentValidationRequest {
    pub validation: String,
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    #[serde(default = "default_true")]
    pub payment: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct MergeTeamsRequest {
    pub team1_id: DbId,
    pub team2_id: DbId,
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Raid dates and contacts, defaulting to an empty record.
async fn load_information(conn: &mut PgConnection) -> AppResult<RaidInformation> {
    match CoreDataRepo::get(&mut *conn, RAID_INFORMATION_SCHEMA).await? {
        Some(row) => serde_json::from_value(row.data).map_err(|e| {
            AppError::Core(CoreError::Internal(format!(
                "Malformed raid information: {e}"
            )))
        }),
        None => Ok(RaidInformation::default()),
    }
}

/// Date against which minority is evaluated: the raid start, else today.
async fn minority_reference(conn: &mut PgConnection) -> AppResult<NaiveDate> {
    let information = load_information(conn).await?;
    Ok(information
        .raid_start_date
        .unwrap_or_else(|| Utc::now().date_naive()))
}

/// Whether `user_id` may act on behalf of `participant_id`: the participant
/// themself or their teammate.
async fn is_self_or_teammate(
    conn: &mut PgConnection,
    user_id: DbId,
    participant_id: DbId,
) -> AppResult<bool> {
    if user_id == participant_id {
        return Ok(true);
    }
    let team = RaidTeamRepo::find_by_participant(&mut *conn, participant_id).await?;
    Ok(team.is_some_and(|team| team.captain_id == user_id || team.second_id == Some(user_id)))
}

fn is_team_member(team: &Team, user_id: DbId) -> bool {
    team.captain_id == user_id || team.second_id == Some(user_id)
}

async fn document_done(conn: &mut PgConnection, document_id: Option<DbId>) -> AppResult<bool> {
    let Some(document_id) = document_id else {
        return Ok(false);
    };
    let document = RaidDocumentRepo::find_by_id(&mut *conn, document_id).await?;
    Ok(document.is_some_and(|d| {
        d.validation == VALIDATION_ACCEPTED || d.validation == VALIDATION_TEMPORARY
    }))
}

async fn checklist(
    conn: &mut PgConnection,
    participant: &Participant,
) -> AppResult<ParticipantChecklist> {
    let personal_details = participant.address.is_some()
        && participant.bike_size.is_some()
        && participant.t_shirt_size.is_some()
        && participant.situation.is_some();

    let needs_student_card = participant
        .situation
        .as_deref()
        .is_some_and(|s| s.starts_with(SCHOOL_SITUATION_PREFIX));
    let student_card = if needs_student_card {
        Some(document_done(conn, participant.student_card_id).await?)
    } else {
        None
    };
    let parent_authorization = if participant.is_minor {
        Some(document_done(conn, participant.parent_authorization_id).await?)
    } else {
        None
    };

    Ok(ParticipantChecklist {
        personal_details,
        id_card: document_done(conn, participant.id_card_id).await?,
        medical_certificate: document_done(conn, participant.medical_certificate_id).await?,
        raid_rules: document_done(conn, participant.raid_rules_id).await?,
        student_card,
        parent_authorization,
        security_file: participant.security_file_id.is_some(),
        payment: participant.payment,
        attestation_on_honour: participant.attestation_on_honour,
    })
}

async fn load_participant(conn: &mut PgConnection, participant_id: DbId) -> AppResult<Participant> {
    RaidParticipantRepo::find_by_id(&mut *conn, participant_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Participant", participant_id).into())
}

/// Recompute a team's validation progress and number it once complete.
async fn refresh_team(conn: &mut PgConnection, team_id: DbId) -> AppResult<()> {
    let Some(team) = RaidTeamRepo::find_by_id(&mut *conn, team_id).await? else {
        return Ok(());
    };

    let captain = load_participant(conn, team.captain_id).await?;
    let captain = checklist(conn, &captain).await?;
    let second = match team.second_id {
        Some(second_id) => {
            let second = load_participant(conn, second_id).await?;
            Some(checklist(conn, &second).await?)
        }
        None => None,
    };

    let progress = team_validation_progress(&captain, second.as_ref());
    RaidTeamRepo::set_validation_progress(&mut *conn, team.id, progress).await?;

    if is_team_validated(progress) && team.number.is_none() {
        if let Some(base) = team.difficulty.as_deref().and_then(difficulty_number_base) {
            let difficulty = team.difficulty.as_deref().unwrap_or_default();
            let current_max = RaidTeamRepo::max_number(&mut *conn, difficulty).await?;
            let number = next_team_number(base, current_max);
            RaidTeamRepo::set_number(&mut *conn, team.id, number).await?;
            tracing::info!(team_id = %team.id, number, "Raid team numbered");
        }
    }
    Ok(())
}

/// Refresh the team of a participant, if they have one.
async fn refresh_participant_team(conn: &mut PgConnection, participant_id: DbId) -> AppResult<()> {
    if let Some(team) = RaidTeamRepo::find_by_participant(&mut *conn, participant_id).await? {
        refresh_team(conn, team.id).await?;
    }
    Ok(())
}

async fn team_detail(conn: &mut PgConnection, team_id: DbId) -> AppResult<TeamDetail> {
    let team = RaidTeamRepo::find_by_id(&mut *conn, team_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Team", team_id))?;
    let captain = load_participant(conn, team.captain_id).await?;
    let second = match team.second_id {
        Some(second_id) => Some(load_participant(conn, second_id).await?),
        None => None,
    };
    Ok(TeamDetail {
        team,
        captain,
        second,
    })
}

fn validate_sizes(bike_size: Option<&str>, t_shirt_size: Option<&str>) -> AppResult<()> {
    if let Some(size) = bike_size {
        validate_size(size)?;
    }
    if let Some(size) = t_shirt_size {
        validate_size(size)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Participants
// ---------------------------------------------------------------------------

/// POST /api/v1/raid/participants
///
/// Register the current user as a participant.
pub async fn create_participant(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateParticipant>,
) -> AppResult<impl IntoResponse> {
    validate_sizes(input.bike_size.as_deref(), input.t_shirt_size.as_deref())?;

    let mut session = TransactionalSession::begin(&state.pool).await?;
    if RaidParticipantRepo::find_by_id(&mut *session, auth.user_id)
        .await?
        .is_some()
    {
        return Err(AppError::forbidden("You are already a participant"));
    }

    let reference = minority_reference(&mut session).await?;
    let participant = RaidParticipantRepo::create(
        &mut *session,
        auth.user_id,
        &input,
        is_minor(input.birthday, reference),
    )
    .await?;
    session.finish().await?;

    tracing::info!(participant_id = %participant.id, "Raid participant registered");

    Ok((StatusCode::CREATED, Json(DataResponse { data: participant })))
}

/// GET /api/v1/raid/participants/{participant_id}
///
/// Visible to the participant, their teammate and raid admins.
pub async fn get_participant(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(participant_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.pool.acquire().await?;
    if !is_self_or_teammate(&mut conn, auth.user_id, participant_id).await?
        && !is_member_of_any(&state, auth.user_id, RAID_ADMIN_GROUPS).await?
    {
        return Err(AppError::forbidden("You can not access this participant"));
    }
    let participant = load_participant(&mut conn, participant_id).await?;
    Ok(Json(DataResponse { data: participant }))
}

/// PATCH /api/v1/raid/participants/{participant_id}
pub async fn update_participant(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(participant_id): Path<DbId>,
    Json(input): Json<UpdateParticipant>,
) -> AppResult<impl IntoResponse> {
    validate_sizes(input.bike_size.as_deref(), input.t_shirt_size.as_deref())?;

    let mut session = TransactionalSession::begin(&state.pool).await?;
    if !is_self_or_teammate(&mut session, auth.user_id, participant_id).await? {
        return Err(AppError::forbidden("You can not edit this participant"));
    }

    let minor = match input.birthday {
        Some(birthday) => {
            let reference = minority_reference(&mut session).await?;
            Some(is_minor(birthday, reference))
        }
        None => None,
    };
    let participant = RaidParticipantRepo::update(&mut *session, participant_id, &input, minor)
        .await?
        .ok_or_else(|| CoreError::not_found("Participant", participant_id))?;
    refresh_participant_team(&mut session, participant_id).await?;
    session.finish().await?;

    Ok(Json(DataResponse { data: participant }))
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

/// POST /api/v1/raid/teams
///
/// Create a team captained by the current user.
pub async fn create_team(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTeam>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Team name must not be empty".into(),
        )));
    }

    let mut session = TransactionalSession::begin(&state.pool).await?;
    if RaidParticipantRepo::find_by_id(&mut *session, auth.user_id)
        .await?
        .is_none()
    {
        return Err(AppError::forbidden("You must be a participant to create a team"));
    }
    if RaidTeamRepo::find_by_participant(&mut *session, auth.user_id)
        .await?
        .is_some()
    {
        return Err(AppError::forbidden("You already have a team"));
    }

    let team = RaidTeamRepo::create(&mut *session, &input.name, auth.user_id).await?;
    refresh_team(&mut session, team.id).await?;
    let detail = team_detail(&mut session, team.id).await?;
    session.finish().await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// GET /api/v1/raid/participants/{participant_id}/team
pub async fn get_team_by_participant(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(participant_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if auth.user_id != participant_id {
        return Err(AppError::forbidden("You can only access your own team"));
    }
    let mut conn = state.pool.acquire().await?;
    let team = RaidTeamRepo::find_by_participant(&mut *conn, participant_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Team of participant", participant_id))?;
    let detail = team_detail(&mut conn, team.id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// GET /api/v1/raid/teams
///
/// Team previews, including validation progress.
pub async fn list_teams(
    RequireRaidAdmin(_admin): RequireRaidAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let teams = RaidTeamRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: teams }))
}

/// GET /api/v1/raid/teams/{team_id}
pub async fn get_team(
    RequireRaidAdmin(_admin): RequireRaidAdmin,
    State(state): State<AppState>,
    Path(team_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.pool.acquire().await?;
    let detail = team_detail(&mut conn, team_id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// PATCH /api/v1/raid/teams/{team_id}
pub async fn update_team(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(team_id): Path<DbId>,
    Json(input): Json<UpdateTeam>,
) -> AppResult<impl IntoResponse> {
    if let Some(difficulty) = &input.difficulty {
        validate_difficulty(difficulty)?;
    }
    if let Some(place) = &input.meeting_place {
        validate_meeting_place(place)?;
    }

    let mut session = TransactionalSession::begin(&state.pool).await?;
    let team = RaidTeamRepo::find_by_id(&mut *session, team_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Team", team_id))?;
    if !is_team_member(&team, auth.user_id) {
        return Err(AppError::forbidden("You are not a member of this team"));
    }

    RaidTeamRepo::update(&mut *session, team_id, &input).await?;
    refresh_team(&mut session, team_id).await?;
    let detail = team_detail(&mut session, team_id).await?;
    session.finish().await?;

    Ok(Json(DataResponse { data: detail }))
}

/// DELETE /api/v1/raid/teams/{team_id}
pub async fn delete_team(
    RequireRaidAdmin(admin): RequireRaidAdmin,
    State(state): State<AppState>,
    Path(team_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !RaidTeamRepo::delete(&state.pool, team_id).await? {
        return Err(AppError::Core(CoreError::not_found("Team", team_id)));
    }
    tracing::info!(team_id = %team_id, admin_id = %admin.user_id, "Raid team deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/raid/teams
pub async fn delete_all_teams(
    RequireRaidAdmin(admin): RequireRaidAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let removed = RaidTeamRepo::delete_all(&state.pool).await?;
    tracing::warn!(removed, admin_id = %admin.user_id, "All raid teams deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// POST /api/v1/raid/participants/{participant_id}/documents
///
/// Record a document and attach it to the slot matching its type.
pub async fn attach_document(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(participant_id): Path<DbId>,
    Json(input): Json<CreateDocument>,
) -> AppResult<impl IntoResponse> {
    validate_document_type(&input.document_type)?;

    let mut session = TransactionalSession::begin(&state.pool).await?;
    if !is_self_or_teammate(&mut session, auth.user_id, participant_id).await? {
        return Err(AppError::forbidden("You can not edit this participant"));
    }
    load_participant(&mut session, participant_id).await?;

    let document = RaidDocumentRepo::create(&mut *session, &input).await?;
    RaidParticipantRepo::attach_document(
        &mut *session,
        participant_id,
        &document.document_type,
        document.id,
    )
    .await?;
    refresh_participant_team(&mut session, participant_id).await?;
    session.finish().await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: document })))
}

/// GET /api/v1/raid/participants/{participant_id}/documents
pub async fn list_documents(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(participant_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.pool.acquire().await?;
    if !is_self_or_teammate(&mut conn, auth.user_id, participant_id).await?
        && !is_member_of_any(&state, auth.user_id, RAID_ADMIN_GROUPS).await?
    {
        return Err(AppError::forbidden("You can not access this participant"));
    }
    let documents = RaidDocumentRepo::list_for_participant(&mut *conn, participant_id).await?;
    Ok(Json(DataResponse { data: documents }))
}

/// PATCH /api/v1/raid/documents/{document_id}/validation
pub async fn set_document_validation(
    RequireRaidAdmin(_admin): RequireRaidAdmin,
    State(state): State<AppState>,
    Path(document_id): Path<DbId>,
    Json(input): Json<DocumentValidationRequest>,
) -> AppResult<impl IntoResponse> {
    validate_document_validation(&input.validation)?;

    let mut session = TransactionalSession::begin(&state.pool).await?;
    let document = RaidDocumentRepo::update_validation(&mut *session, document_id, &input.validation)
        .await?
        .ok_or_else(|| CoreError::not_found("Document", document_id))?;

    let owner = RaidParticipantRepo::find_by_document(&mut *session, document_id).await?;
    if let Some(owner) = owner {
        refresh_participant_team(&mut session, owner.id).await?;
    }
    session.finish().await?;

    Ok(Json(DataResponse { data: document }))
}

// ---------------------------------------------------------------------------
// Security file, payment, attestation
// ---------------------------------------------------------------------------

/// POST /api/v1/raid/participants/{participant_id}/security_file
///
/// Create the participant's security file, or replace it if one exists.
pub async fn set_security_file(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(participant_id): Path<DbId>,
    Json(input): Json<CreateSecurityFile>,
) -> AppResult<impl IntoResponse> {
    let mut session = TransactionalSession::begin(&state.pool).await?;
    if !is_self_or_teammate(&mut session, auth.user_id, participant_id).await? {
        return Err(AppError::forbidden("You can not edit this participant"));
    }
    let participant = load_participant(&mut session, participant_id).await?;

    let existing = match participant.security_file_id {
        Some(id) => SecurityFileRepo::replace(&mut *session, id, &input).await?,
        None => None,
    };
    let file = match existing {
        Some(file) => file,
        None => {
            let file = SecurityFileRepo::create(&mut *session, &input).await?;
            RaidParticipantRepo::set_security_file(&mut *session, participant_id, file.id).await?;
            file
        }
    };
    refresh_participant_team(&mut session, participant_id).await?;
    session.finish().await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: file })))
}

/// POST /api/v1/raid/participants/{participant_id}/payment
pub async fn confirm_payment(
    RequireRaidAdmin(admin): RequireRaidAdmin,
    State(state): State<AppState>,
    Path(participant_id): Path<DbId>,
    Json(input): Json<PaymentRequest>,
) -> AppResult<impl IntoResponse> {
    let mut session = TransactionalSession::begin(&state.pool).await?;
    if !RaidParticipantRepo::set_payment(&mut *session, participant_id, input.payment).await? {
        return Err(AppError::Core(CoreError::not_found(
            "Participant",
            participant_id,
        )));
    }
    refresh_participant_team(&mut session, participant_id).await?;
    session.finish().await?;

    tracing::info!(
        participant_id = %participant_id,
        payment = input.payment,
        admin_id = %admin.user_id,
        "Raid payment updated",
    );

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/raid/participants/{participant_id}/honour
pub async fn confirm_attestation_on_honour(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(participant_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if auth.user_id != participant_id {
        return Err(AppError::forbidden("Only the participant can sign the attestation"));
    }

    let mut session = TransactionalSession::begin(&state.pool).await?;
    if !RaidParticipantRepo::set_attestation_on_honour(&mut *session, participant_id).await? {
        return Err(AppError::Core(CoreError::not_found(
            "Participant",
            participant_id,
        )));
    }
    refresh_participant_team(&mut session, participant_id).await?;
    session.finish().await?;

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Invites, kicks and merges
// ---------------------------------------------------------------------------

/// POST /api/v1/raid/teams/{team_id}/invite
///
/// Returns the team's invite token, creating it on first call.
pub async fn create_invite_token(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(team_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut session = TransactionalSession::begin(&state.pool).await?;
    let team = RaidTeamRepo::find_by_id(&mut *session, team_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Team", team_id))?;
    if !is_team_member(&team, auth.user_id) {
        return Err(AppError::forbidden("You are not a member of this team"));
    }

    let invite = match InviteTokenRepo::find_by_team(&mut *session, team_id).await? {
        Some(invite) => invite,
        None => InviteTokenRepo::create(&mut *session, &generate_invite_token(), team_id).await?,
    };
    session.finish().await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: invite })))
}

/// POST /api/v1/raid/teams/join/{token}
///
/// Join the team owning `token` as its second. A solo team the joiner
/// captained is deleted.
pub async fn join_team(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<impl IntoResponse> {
    let mut session = TransactionalSession::begin(&state.pool).await?;

    let invite = InviteTokenRepo::find_by_token(&mut *session, &token)
        .await?
        .ok_or_else(|| CoreError::not_found("Invite token", &token))?;
    load_participant(&mut session, auth.user_id).await?;

    let team = RaidTeamRepo::find_by_id(&mut *session, invite.team_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Team", invite.team_id))?;
    if is_team_member(&team, auth.user_id) {
        return Err(AppError::forbidden("You are already a member of this team"));
    }
    if team.second_id.is_some() {
        return Err(AppError::forbidden("This team is already full"));
    }

    if let Some(own_team) = RaidTeamRepo::find_by_participant(&mut *session, auth.user_id).await? {
        if own_team.second_id.is_some() {
            return Err(AppError::forbidden("You already have a teammate"));
        }
        RaidTeamRepo::delete(&mut *session, own_team.id).await?;
    }

    RaidTeamRepo::set_second(&mut *session, team.id, Some(auth.user_id)).await?;
    InviteTokenRepo::delete(&mut *session, invite.id).await?;
    refresh_team(&mut session, team.id).await?;
    let detail = team_detail(&mut session, team.id).await?;
    session.finish().await?;

    tracing::info!(team_id = %team.id, participant_id = %auth.user_id, "Participant joined raid team");

    Ok(Json(DataResponse { data: detail }))
}

/// POST /api/v1/raid/teams/{team_id}/kick/{participant_id}
///
/// Remove a member. Kicking the captain promotes the second.
pub async fn kick_team_member(
    RequireRaidAdmin(admin): RequireRaidAdmin,
    State(state): State<AppState>,
    Path((team_id, participant_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let mut session = TransactionalSession::begin(&state.pool).await?;
    let team = RaidTeamRepo::find_by_id(&mut *session, team_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Team", team_id))?;

    if team.second_id == Some(participant_id) {
        RaidTeamRepo::set_second(&mut *session, team_id, None).await?;
    } else if team.captain_id == participant_id {
        if !RaidTeamRepo::promote_second(&mut *session, team_id).await? {
            return Err(AppError::Core(CoreError::Validation(
                "Can not kick the only member of a team".into(),
            )));
        }
    } else {
        return Err(AppError::Core(CoreError::Validation(
            "The participant is not a member of this team".into(),
        )));
    }

    refresh_team(&mut session, team_id).await?;
    let detail = team_detail(&mut session, team_id).await?;
    session.finish().await?;

    tracing::info!(
        team_id = %team_id,
        participant_id = %participant_id,
        admin_id = %admin.user_id,
        "Participant kicked from raid team",
    );

    Ok(Json(DataResponse { data: detail }))
}

/// POST /api/v1/raid/teams/merge
///
/// Merge two solo teams. The first team survives with both captains.
pub async fn merge_teams(
    RequireRaidAdmin(admin): RequireRaidAdmin,
    State(state): State<AppState>,
    Json(input): Json<MergeTeamsRequest>,
) -> AppResult<impl IntoResponse> {
    if input.team1_id == input.team2_id {
        return Err(AppError::Core(CoreError::Validation(
            "Can not merge a team with itself".into(),
        )));
    }

    let mut session = TransactionalSession::begin(&state.pool).await?;
    let first = RaidTeamRepo::find_by_id(&mut *session, input.team1_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Team", input.team1_id))?;
    let second = RaidTeamRepo::find_by_id(&mut *session, input.team2_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Team", input.team2_id))?;
    if first.second_id.is_some() || second.second_id.is_some() {
        return Err(AppError::forbidden("Only solo teams can be merged"));
    }

    let merged = Team {
        name: merged_team_name(&first.name, &second.name),
        number: merged_team_number(first.number, second.number),
        difficulty: keep_if_equal(first.difficulty.clone(), second.difficulty.clone()),
        meeting_place: keep_if_equal(first.meeting_place.clone(), second.meeting_place.clone()),
        second_id: Some(second.captain_id),
        ..first.clone()
    };

    RaidTeamRepo::delete(&mut *session, second.id).await?;
    RaidTeamRepo::apply_merge(&mut *session, first.id, &merged).await?;
    refresh_team(&mut session, first.id).await?;
    let detail = team_detail(&mut session, first.id).await?;
    session.finish().await?;

    tracing::info!(
        team_id = %first.id,
        merged_team_id = %second.id,
        admin_id = %admin.user_id,
        "Raid teams merged",
    );

    Ok(Json(DataResponse { data: detail }))
}

// ---------------------------------------------------------------------------
// Raid information
// ---------------------------------------------------------------------------

/// GET /api/v1/raid/information
pub async fn get_information(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.pool.acquire().await?;
    let information = load_information(&mut conn).await?;
    Ok(Json(DataResponse { data: information }))
}

/// PATCH /api/v1/raid/information
pub async fn update_information(
    RequireRaidAdmin(_admin): RequireRaidAdmin,
    State(state): State<AppState>,
    Json(input): Json<RaidInformation>,
) -> AppResult<impl IntoResponse> {
    let mut session = TransactionalSession::begin(&state.pool).await?;
    let information = load_information(&mut session).await?.merge(input);
    let data = serde_json::to_value(&information)
        .map_err(|e| AppError::Core(CoreError::Internal(e.to_string())))?;
    CoreDataRepo::upsert(&mut *session, RAID_INFORMATION_SCHEMA, &data).await?;
    session.finish().await?;

    Ok(Json(DataResponse { data: information }))
}
