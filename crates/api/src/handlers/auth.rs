//! Login, token rotation and logout.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use hyperion_core::error::CoreError;
use hyperion_core::types::DbId;
use hyperion_db::models::session::CreateSession;
use hyperion_db::repositories::{SessionRepo, UserRepo};
use hyperion_db::TransactionalSession;
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use validator::Validate;

use crate::auth::jwt::{issue_tokens, refresh_token_digest, JwtConfig};
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Token pair returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Seconds until the access token expires.
    pub expires_in: i64,
    pub token_type: &'static str,
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.to_string()))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    const BAD_CREDENTIALS: &str = "Incorrect login or password";

    // A malformed address cannot match an account; answer like a wrong one.
    input.validate().map_err(|_| unauthorized(BAD_CREDENTIALS))?;

    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| unauthorized(BAD_CREDENTIALS))?;

    let matches = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;
    if !matches {
        tracing::info!(user_id = %user.id, "Rejected login");
        return Err(unauthorized(BAD_CREDENTIALS));
    }

    let mut session = TransactionalSession::begin(&state.pool).await?;
    let tokens = open_session(&mut session, &state.config.jwt, user.id).await?;
    session.finish().await?;

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(Json(tokens))
}

/// POST /api/v1/auth/refresh
///
/// The presented refresh token is single-use: redeeming it revokes its
/// session, and a new one is opened in the same transaction. A concurrent
/// redemption of the same token blocks on the row and then finds it revoked.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<TokenResponse>> {
    let digest = refresh_token_digest(&input.refresh_token);

    let mut session = TransactionalSession::begin(&state.pool).await?;

    let previous = SessionRepo::redeem(&mut *session, &digest)
        .await?
        .ok_or_else(|| unauthorized("Invalid or expired refresh token"))?;

    if UserRepo::find_by_id(&mut *session, previous.user_id)
        .await?
        .is_none()
    {
        return Err(unauthorized("User no longer exists"));
    }

    let tokens = open_session(&mut session, &state.config.jwt, previous.user_id).await?;
    session.finish().await?;

    Ok(Json(tokens))
}

/// POST /api/v1/auth/logout
///
/// Revokes every session of the caller, on all devices.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, auth.user_id).await?;
    tracing::info!(user_id = %auth.user_id, revoked, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// Issue a token pair and record its refresh digest.
async fn open_session(
    conn: &mut PgConnection,
    jwt: &JwtConfig,
    user_id: DbId,
) -> AppResult<TokenResponse> {
    let tokens = issue_tokens(user_id, jwt)
        .map_err(|e| AppError::InternalError(format!("Token signing failed: {e}")))?;

    SessionRepo::create(
        conn,
        &CreateSession {
            user_id,
            refresh_token_hash: tokens.refresh_token_hash,
            expires_at: tokens.refresh_expires_at,
        },
    )
    .await?;

    Ok(TokenResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        expires_in: jwt.access_ttl().num_seconds(),
        token_type: "bearer",
    })
}
