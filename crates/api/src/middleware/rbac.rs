//! Group-based guards.
//!
//! Each guard authenticates the caller and checks membership of at least
//! one of its groups. Members of `admin` pass every module-admin guard.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use hyperion_core::error::CoreError;
use hyperion_core::groups::{
    ECL_GROUPS, GROUP_ADMIN, GROUP_COMPETITION_ADMIN, GROUP_FEED_ADMIN, GROUP_RAID_ADMIN,
    GROUP_SDEC_FACTURATION_ADMIN,
};
use hyperion_core::types::DbId;
use hyperion_db::repositories::MembershipRepo;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Whether `user_id` belongs to one of `groups`, for rules that mix
/// ownership with membership.
pub async fn is_member_of_any(
    state: &AppState,
    user_id: DbId,
    groups: &[DbId],
) -> Result<bool, AppError> {
    Ok(MembershipRepo::exists_any(&state.pool, user_id, groups).await?)
}

async fn authorize(
    parts: &mut Parts,
    state: &AppState,
    groups: &[DbId],
    denied: &str,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if is_member_of_any(state, user.user_id, groups).await? {
        return Ok(user);
    }
    tracing::debug!(user_id = %user.user_id, path = %parts.uri.path(), "Group check failed");
    Err(CoreError::Forbidden(denied.to_string()).into())
}

macro_rules! group_guard {
    ($(#[$doc:meta])* $name:ident, [$($group:expr),+ $(,)?], $denied:literal) => {
        $(#[$doc])*
        pub struct $name(pub AuthUser);

        impl FromRequestParts<AppState> for $name {
            type Rejection = AppError;

            async fn from_request_parts(
                parts: &mut Parts,
                state: &AppState,
            ) -> Result<Self, AppError> {
                let groups: &[DbId] = &[$($group),+];
                authorize(parts, state, groups, $denied).await.map($name)
            }
        }
    };
}

group_guard!(
    /// `admin` only.
    RequireAdmin,
    [GROUP_ADMIN],
    "Admin group required"
);

/// Any ECL group: AE, staff, student, association or admin.
pub struct RequireEclMember(pub AuthUser);

impl FromRequestParts<AppState> for RequireEclMember {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        authorize(parts, state, ECL_GROUPS, "ECL membership required")
            .await
            .map(RequireEclMember)
    }
}

group_guard!(
    RequireFeedAdmin,
    [GROUP_FEED_ADMIN, GROUP_ADMIN],
    "Feed admin group required"
);
group_guard!(
    RequireSdecAdmin,
    [GROUP_SDEC_FACTURATION_ADMIN, GROUP_ADMIN],
    "sdec_facturation admin group required"
);
group_guard!(
    RequireRaidAdmin,
    [GROUP_RAID_ADMIN, GROUP_ADMIN],
    "Raid admin group required"
);
group_guard!(
    RequireCompetitionAdmin,
    [GROUP_COMPETITION_ADMIN, GROUP_ADMIN],
    "Competition admin group required"
);
