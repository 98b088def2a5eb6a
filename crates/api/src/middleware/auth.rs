//! Bearer-token extractor.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use hyperion_core::error::CoreError;
use hyperion_core::types::DbId;

use crate::auth::jwt::decode_access_token;
use crate::error::AppError;
use crate::router::REQUEST_ID_HEADER;
use crate::state::AppState;

/// Caller identified by a valid access token.
///
/// Taking `AuthUser` as a handler argument makes the route require
/// authentication; group-based guards in [`super::rbac`] build on it.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    /// Set by the request-id layer; carried into audit logs.
    pub request_id: Option<String>,
}

fn bearer_token(parts: &Parts) -> Result<&str, CoreError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| CoreError::Unauthorized("Missing Authorization header".into()))?;
    header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| CoreError::Unauthorized("Expected 'Authorization: Bearer <token>'".into()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = bearer_token(parts)?;
        let claims = decode_access_token(token, &state.config.jwt)
            .map_err(|_| CoreError::Unauthorized("Invalid or expired token".into()))?;

        Ok(AuthUser {
            user_id: claims.sub,
            request_id: parts
                .headers
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(String::from),
        })
    }
}
