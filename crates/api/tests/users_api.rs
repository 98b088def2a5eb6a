//! HTTP-level integration tests for account creation, password recovery
//! and user administration.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get_auth, patch_json_auth, post_json, post_json_auth,
    user_with_token, TEST_PASSWORD,
};
use hyperion_core::groups::{GROUP_ADMIN, GROUP_STUDENT};
use hyperion_core::schools::{SCHOOL_CENTRALE_LYON, SCHOOL_NO_SCHOOL};
use hyperion_core::types::DbId;
use hyperion_db::repositories::{MembershipRepo, UserRepo};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn pending_account(pool: &PgPool, email: &str) -> Option<(String, String, DbId)> {
    sqlx::query_as::<_, (String, String, DbId)>(
        "SELECT activation_token, account_type, school_id
         FROM core_user_unconfirmed WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await
    .unwrap()
}

async fn reset_token(pool: &PgPool, user_id: DbId) -> String {
    sqlx::query_scalar("SELECT reset_token FROM core_user_recover_request WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn request_account(pool: &PgPool, body: serde_json::Value) -> StatusCode {
    let app = common::build_test_app(pool.clone());
    post_json(app, "/api/v1/users/create", body).await.status()
}

// ---------------------------------------------------------------------------
// Account creation
// ---------------------------------------------------------------------------

/// A school address gets the requested account type and that school.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_account_for_school_address(pool: PgPool) {
    let status = request_account(
        &pool,
        json!({ "email": "Jane.Doe@etu.ec-lyon.fr", "account_type": "student" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, account_type, school_id) = pending_account(&pool, "jane.doe@etu.ec-lyon.fr")
        .await
        .expect("request should be recorded under the lowercased email");
    assert_eq!(account_type, "student");
    assert_eq!(school_id, SCHOOL_CENTRALE_LYON);
}

/// Other addresses become external accounts, whatever they asked for.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_account_for_outside_address_is_external(pool: PgPool) {
    let status = request_account(
        &pool,
        json!({ "email": "someone@example.com", "account_type": "staff" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, account_type, school_id) = pending_account(&pool, "someone@example.com").await.unwrap();
    assert_eq!(account_type, "external");
    assert_eq!(school_id, SCHOOL_NO_SCHOOL);
}

/// An existing address gets the same answer and no new request.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_account_for_existing_email(pool: PgPool) {
    user_with_token(&pool, "taken@etu.ec-lyon.fr", &[]).await;

    let status = request_account(&pool, json!({ "email": "taken@etu.ec-lyon.fr" })).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(pending_account(&pool, "taken@etu.ec-lyon.fr").await.is_none());
}

/// Malformed emails and unknown account types are rejected.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_account_validation(pool: PgPool) {
    for email in ["nope", "a@@b.c", "a@b.", "a@b..c", " x@etu.ec-lyon.fr"] {
        let status = request_account(&pool, json!({ "email": email })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{email:?} must be rejected");
        assert!(pending_account(&pool, email).await.is_none());
    }

    let status = request_account(
        &pool,
        json!({ "email": "x@etu.ec-lyon.fr", "account_type": "wizard" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

/// Activation creates the user and its account type membership.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_activate_account(pool: PgPool) {
    request_account(&pool, json!({ "email": "new@etu.ec-lyon.fr" })).await;
    let (token, _, _) = pending_account(&pool, "new@etu.ec-lyon.fr").await.unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/users/activate",
        json!({
            "activation_token": token,
            "password": "a-good-password",
            "name": "Doe",
            "firstname": "John",
            "promo": 2024,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["email"], "new@etu.ec-lyon.fr");
    assert!(json["data"].get("password_hash").is_none());

    let user = UserRepo::find_by_email(&pool, "new@etu.ec-lyon.fr")
        .await
        .unwrap()
        .unwrap();
    assert!(MembershipRepo::exists(&pool, user.id, GROUP_STUDENT).await.unwrap());
    assert!(pending_account(&pool, "new@etu.ec-lyon.fr").await.is_none());
}

/// Unknown tokens give 404, weak passwords 400.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_activate_account_errors(pool: PgPool) {
    let body = |token: &str, password: &str| {
        json!({
            "activation_token": token,
            "password": password,
            "name": "Doe",
            "firstname": "John",
        })
    };

    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/users/activate", body("missing", "a-good-password")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    request_account(&pool, json!({ "email": "weak@etu.ec-lyon.fr" })).await;
    let (token, _, _) = pending_account(&pool, "weak@etu.ec-lyon.fr").await.unwrap();
    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/users/activate", body(&token, "abc")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Passwords
// ---------------------------------------------------------------------------

/// Recover then reset lets the user log in with the new password.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_recover_and_reset_password(pool: PgPool) {
    let (user, _) = user_with_token(&pool, "forgot@etu.ec-lyon.fr", &[]).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/users/recover",
        json!({ "email": "forgot@etu.ec-lyon.fr" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let token = reset_token(&pool, user.id).await;
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/users/reset-password",
        json!({ "reset_token": token, "new_password": "brand-new-password" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "email": "forgot@etu.ec-lyon.fr", "password": "brand-new-password" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Recovering an unknown address answers like a known one.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_recover_unknown_email(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/users/recover",
        json!({ "email": "nobody@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

/// Changing the password requires the current one.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_change_password(pool: PgPool) {
    let (_, token) = user_with_token(&pool, "change@etu.ec-lyon.fr", &[]).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/users/change-password",
        &token,
        json!({ "old_password": "wrong", "new_password": "another-password" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/users/change-password",
        &token,
        json!({ "old_password": TEST_PASSWORD, "new_password": "another-password" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

// ---------------------------------------------------------------------------
// Profiles and administration
// ---------------------------------------------------------------------------

/// Users edit their own profile through `/me`.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_me(pool: PgPool) {
    let (_, token) = user_with_token(&pool, "me@etu.ec-lyon.fr", &[]).await;

    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(
        app,
        "/api/v1/users/me",
        &token,
        json!({ "nickname": "JD", "floor": "A2" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, "/api/v1/users/me", &token).await).await;
    assert_eq!(json["data"]["nickname"], "JD");
    assert_eq!(json["data"]["floor"], "A2");
}

/// Listing users is reserved to admins and filters by account type.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_users_requires_admin(pool: PgPool) {
    let (_, user_token) = user_with_token(&pool, "user@etu.ec-lyon.fr", &[GROUP_STUDENT]).await;
    let (_, admin_token) = user_with_token(&pool, "admin@etu.ec-lyon.fr", &[GROUP_ADMIN]).await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/users", &user_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/users?account_types=student", &admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/users?account_types=external", &admin_token).await;
    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

/// Search matches on name fragments.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_users(pool: PgPool) {
    let (_, token) = user_with_token(&pool, "searcher@etu.ec-lyon.fr", &[]).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/users/search?query=doe", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

/// Admins delete users; the row is gone afterwards.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_user(pool: PgPool) {
    let (victim, _) = user_with_token(&pool, "victim@etu.ec-lyon.fr", &[GROUP_STUDENT]).await;
    let (_, admin_token) = user_with_token(&pool, "root@etu.ec-lyon.fr", &[GROUP_ADMIN]).await;

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/users/{}", victim.id);
    let response = delete_auth(app, &uri, &admin_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert!(UserRepo::find_by_id(&pool, victim.id).await.unwrap().is_none());

    let app = common::build_test_app(pool);
    let response = delete_auth(app, &uri, &admin_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
