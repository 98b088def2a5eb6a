//! User, pending account and password recovery models.

use chrono::NaiveDate;
use hyperion_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `core_user` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub school_id: DbId,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub account_type: String,
    pub name: String,
    pub firstname: String,
    pub nickname: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub promo: Option<i32>,
    pub phone: Option<String>,
    pub floor: Option<String>,
    pub created_on: Timestamp,
}

/// Public subset of a user, embedded in group listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserSimple {
    pub id: DbId,
    pub name: String,
    pub firstname: String,
    pub nickname: Option<String>,
    pub account_type: String,
    pub school_id: DbId,
}

/// DTO for inserting a confirmed user.
#[derive(Debug)]
pub struct CreateUser {
    pub email: String,
    pub school_id: DbId,
    pub password_hash: String,
    pub account_type: String,
    pub name: String,
    pub firstname: String,
    pub nickname: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub promo: Option<i32>,
    pub phone: Option<String>,
    pub floor: Option<String>,
}

/// Admin-side user update. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub firstname: Option<String>,
    pub nickname: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub promo: Option<i32>,
    pub phone: Option<String>,
    pub floor: Option<String>,
    pub school_id: Option<DbId>,
    pub account_type: Option<String>,
}

/// Self-service user update.
#[derive(Debug, Deserialize)]
pub struct UpdateCurrentUser {
    pub nickname: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub phone: Option<String>,
    pub floor: Option<String>,
}

impl From<UpdateCurrentUser> for UpdateUser {
    fn from(input: UpdateCurrentUser) -> Self {
        UpdateUser {
            nickname: input.nickname,
            birthday: input.birthday,
            phone: input.phone,
            floor: input.floor,
            ..Default::default()
        }
    }
}

/// A row from the `core_user_unconfirmed` table.
#[derive(Debug, Clone, FromRow)]
pub struct UnconfirmedUser {
    pub id: DbId,
    pub email: String,
    pub account_type: String,
    pub school_id: DbId,
    pub activation_token: String,
    pub created_on: Timestamp,
    pub expire_on: Timestamp,
}

/// DTO for recording an account creation request.
#[derive(Debug)]
pub struct CreateUnconfirmedUser {
    pub email: String,
    pub account_type: String,
    pub school_id: DbId,
    pub activation_token: String,
    pub expire_on: Timestamp,
}

/// A row from the `core_user_recover_request` table.
#[derive(Debug, Clone, FromRow)]
pub struct RecoverRequest {
    pub reset_token: String,
    pub user_id: DbId,
    pub created_on: Timestamp,
    pub expire_on: Timestamp,
}
