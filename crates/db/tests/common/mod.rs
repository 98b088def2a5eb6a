//! Shared fixtures for repository tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use hyperion_core::groups::ACCOUNT_STUDENT;
use hyperion_core::schools::SCHOOL_CENTRALE_LYON;
use hyperion_db::models::user::{CreateUser, User};
use hyperion_db::repositories::UserRepo;
use sqlx::PgPool;

pub fn new_user(email: &str, name: &str, firstname: &str) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        school_id: SCHOOL_CENTRALE_LYON,
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        account_type: ACCOUNT_STUDENT.to_string(),
        name: name.to_string(),
        firstname: firstname.to_string(),
        nickname: None,
        birthday: NaiveDate::from_ymd_opt(2003, 4, 12),
        promo: Some(2023),
        phone: None,
        floor: None,
    }
}

pub async fn insert_user(pool: &PgPool, email: &str) -> User {
    UserRepo::create(pool, &new_user(email, "Doe", "Jane"))
        .await
        .unwrap()
}
