//! HTTP-level integration tests for groups, memberships and schools.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, delete_json_auth, get_auth, patch_json_auth, post_json_auth,
    user_with_token,
};
use hyperion_core::groups::{GROUP_ADMIN, GROUP_AE, GROUP_STUDENT};
use hyperion_core::schools::SCHOOL_CENTRALE_LYON;
use hyperion_db::repositories::MembershipRepo;
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

/// Admins create groups; names must be unique.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_group(pool: PgPool) {
    let (_, token) = user_with_token(&pool, "admin@etu.ec-lyon.fr", &[GROUP_ADMIN]).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/groups",
        &token,
        json!({ "name": "Chess club", "description": "Knights and bishops" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Chess club");

    let app = common::build_test_app(pool);
    let response = post_json_auth(app, "/api/v1/groups", &token, json!({ "name": "Chess club" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Listing groups is open to ECL members, creating them is not.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_group_permissions(pool: PgPool) {
    let (_, token) = user_with_token(&pool, "student@etu.ec-lyon.fr", &[GROUP_STUDENT]).await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/groups", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let response = post_json_auth(app, "/api/v1/groups", &token, json!({ "name": "Mine" })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Renaming keeps the id; base groups cannot be deleted.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_and_delete_group(pool: PgPool) {
    let (_, token) = user_with_token(&pool, "admin@etu.ec-lyon.fr", &[GROUP_ADMIN]).await;

    let app = common::build_test_app(pool.clone());
    let created = body_json(
        post_json_auth(app, "/api/v1/groups", &token, json!({ "name": "Band" })).await,
    )
    .await;
    let uri = format!("/api/v1/groups/{}", created["data"]["id"].as_str().unwrap());

    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(app, &uri, &token, json!({ "name": "Big band" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["name"], "Big band");

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool);
    let response = delete_auth(app, &format!("/api/v1/groups/{GROUP_STUDENT}"), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Memberships
// ---------------------------------------------------------------------------

/// Adding a member returns the group with its members; twice is a conflict.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_membership(pool: PgPool) {
    let (_, token) = user_with_token(&pool, "admin@etu.ec-lyon.fr", &[GROUP_ADMIN]).await;
    let (member, _) = user_with_token(&pool, "member@etu.ec-lyon.fr", &[]).await;
    let body = json!({ "user_id": member.id, "group_id": GROUP_AE });

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/groups/membership", &token, body.clone()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], GROUP_AE.to_string());
    assert_eq!(json["data"]["members"].as_array().unwrap().len(), 1);

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/groups/membership", &token, body.clone()).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");

    let app = common::build_test_app(pool.clone());
    let response = delete_json_auth(app, "/api/v1/groups/membership", &token, body.clone()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(!MembershipRepo::exists(&pool, member.id, GROUP_AE).await.unwrap());

    let app = common::build_test_app(pool);
    let response = delete_json_auth(app, "/api/v1/groups/membership", &token, body).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Batch membership skips unknown emails and empties the group on delete.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_batch_membership(pool: PgPool) {
    let (_, token) = user_with_token(&pool, "admin@etu.ec-lyon.fr", &[GROUP_ADMIN]).await;
    let (first, _) = user_with_token(&pool, "first@etu.ec-lyon.fr", &[]).await;
    let (second, _) = user_with_token(&pool, "second@etu.ec-lyon.fr", &[]).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/groups/batch-membership",
        &token,
        json!({
            "group_id": GROUP_AE,
            "user_emails": ["first@etu.ec-lyon.fr", "second@etu.ec-lyon.fr", "ghost@example.com"],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["members"].as_array().unwrap().len(), 2);

    let app = common::build_test_app(pool.clone());
    let response = delete_json_auth(
        app,
        "/api/v1/groups/batch-membership",
        &token,
        json!({ "group_id": GROUP_AE }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert!(!MembershipRepo::exists(&pool, first.id, GROUP_AE).await.unwrap());
    assert!(!MembershipRepo::exists(&pool, second.id, GROUP_AE).await.unwrap());
}

// ---------------------------------------------------------------------------
// Schools
// ---------------------------------------------------------------------------

/// Invalid regexes are rejected at creation.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_school_validates_regex(pool: PgPool) {
    let (_, token) = user_with_token(&pool, "admin@etu.ec-lyon.fr", &[GROUP_ADMIN]).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/schools",
        &token,
        json!({ "name": "Broken", "email_regex": "([a-z" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Schools can be created and deleted, base schools cannot be deleted.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_school_lifecycle(pool: PgPool) {
    let (_, token) = user_with_token(&pool, "admin@etu.ec-lyon.fr", &[GROUP_ADMIN]).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/schools",
        &token,
        json!({ "name": "INSA Lyon", "email_regex": r"^[\w.]+@insa-lyon\.fr$" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let school_id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let app = common::build_test_app(pool.clone());
    let json = body_json(get_auth(app, "/api/v1/schools", &token).await).await;
    assert!(json["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|s| s["name"] == "INSA Lyon"));

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/schools/{school_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/schools/{SCHOOL_CENTRALE_LYON}");
    let response = delete_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
