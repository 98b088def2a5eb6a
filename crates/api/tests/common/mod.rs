//! Shared harness for HTTP-level integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use hyperion_api::auth::jwt::{issue_tokens, JwtConfig};
use hyperion_api::auth::password::hash_password;
use hyperion_api::config::ServerConfig;
use hyperion_api::router::build_app_router;
use hyperion_api::state::AppState;
use hyperion_core::groups::ACCOUNT_STUDENT;
use hyperion_core::schools::SCHOOL_CENTRALE_LYON;
use hyperion_core::types::DbId;
use hyperion_db::models::group::CreateMembership;
use hyperion_db::models::user::{CreateUser, User};
use hyperion_db::repositories::{MembershipRepo, UserRepo};
use hyperion_events::{EventBus, Mailer};
use sqlx::PgPool;
use tower::ServiceExt;

/// Password of every user created by [`create_user`].
pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults.
///
/// The FFSU register points at an unroutable address so licence checks
/// fail fast.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        base_url: "http://localhost:3000".to_string(),
        ffsu_url: "http://127.0.0.1:9/resultat.php".to_string(),
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router over `pool`, with emails only logged.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::new(EventBus::default()),
        mailer: Arc::new(Mailer::new(None).unwrap()),
        http: reqwest::Client::new(),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a Centrale student with [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, email: &str) -> User {
    let input = CreateUser {
        email: email.to_string(),
        school_id: SCHOOL_CENTRALE_LYON,
        password_hash: hash_password(TEST_PASSWORD).unwrap(),
        account_type: ACCOUNT_STUDENT.to_string(),
        name: "Doe".to_string(),
        firstname: "Jane".to_string(),
        nickname: None,
        birthday: NaiveDate::from_ymd_opt(2002, 5, 17),
        promo: Some(2023),
        phone: None,
        floor: None,
    };
    UserRepo::create(pool, &input).await.unwrap()
}

pub async fn add_to_group(pool: &PgPool, user_id: DbId, group_id: DbId) {
    MembershipRepo::create(
        pool,
        &CreateMembership {
            user_id,
            group_id,
            description: None,
        },
    )
    .await
    .unwrap();
}

/// Insert a user, add them to `groups` and return `(user, access token)`.
pub async fn user_with_token(pool: &PgPool, email: &str, groups: &[DbId]) -> (User, String) {
    let user = create_user(pool, email).await;
    for group_id in groups {
        add_to_group(pool, user.id, *group_id).await;
    }
    let token = issue_tokens(user.id, &test_config().jwt).unwrap().access_token;
    (user, token)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn delete_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), Some(body)).await
}
