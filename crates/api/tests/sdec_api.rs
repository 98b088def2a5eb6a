//! HTTP-level integration tests for the print shop invoicing module.

mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::{
    body_json, delete_auth, get_auth, patch_json_auth, post_json_auth, user_with_token,
};
use hyperion_core::groups::{GROUP_ADMIN, GROUP_SDEC_FACTURATION_ADMIN, GROUP_STUDENT};
use serde_json::{json, Value};
use sqlx::PgPool;

const BASE: &str = "/api/v1/sdec_facturation";

async fn post(pool: &PgPool, token: &str, path: &str, body: Value) -> (StatusCode, Value) {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, &format!("{BASE}{path}"), token, body).await;
    let status = response.status();
    (status, body_json(response).await)
}

async fn list(pool: &PgPool, token: &str, path: &str) -> Vec<Value> {
    let app = common::build_test_app(pool.clone());
    let json = body_json(get_auth(app, &format!("{BASE}{path}"), token).await).await;
    json["data"].as_array().unwrap().clone()
}

/// Mandate 2025, one member and one association. Returns their ids.
async fn seed_directory(pool: &PgPool, token: &str) -> (String, String) {
    let (status, _) = post(pool, token, "/mandate", json!({ "year": 2025, "name": "Mandat 2025" })).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, member) = post(
        pool,
        token,
        "/member",
        json!({ "name": "Alice", "mandate": 2025, "role": "trez" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, association) = post(
        pool,
        token,
        "/association",
        json!({ "name": "Club Photo", "type": "aeecl", "structure": "club" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    (
        member["data"]["id"].as_str().unwrap().to_string(),
        association["data"]["id"].as_str().unwrap().to_string(),
    )
}

// ---------------------------------------------------------------------------
// Mandates and members
// ---------------------------------------------------------------------------

/// Writes require the module admin group, reads only a login.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_permissions(pool: PgPool) {
    let (_, student) = user_with_token(&pool, "student@etu.ec-lyon.fr", &[GROUP_STUDENT]).await;
    let (_, admin) = user_with_token(&pool, "admin@etu.ec-lyon.fr", &[GROUP_ADMIN]).await;

    let (status, _) = post(&pool, &student, "/mandate", json!({ "year": 2025, "name": "M" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = post(&pool, &admin, "/mandate", json!({ "year": 2025, "name": "M" })).await;
    assert_eq!(status, StatusCode::CREATED);

    assert_eq!(list(&pool, &student, "/mandate").await.len(), 1);
}

/// A year holds a single mandate, and a mandate with members stays.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mandate_rules(pool: PgPool) {
    let (_, token) =
        user_with_token(&pool, "sdec@etu.ec-lyon.fr", &[GROUP_SDEC_FACTURATION_ADMIN]).await;
    seed_directory(&pool, &token).await;

    let (status, _) = post(&pool, &token, "/mandate", json!({ "year": 2025, "name": "Again" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(
        app,
        &format!("{BASE}/mandate/2025"),
        &token,
        json!({ "name": "Renamed" }),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["name"], "Renamed");

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("{BASE}/mandate/2025"), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let response = delete_auth(app, &format!("{BASE}/mandate/1999"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Members with an unknown role are rejected; deleted members are hidden.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_members_are_hidden_on_delete(pool: PgPool) {
    let (_, token) =
        user_with_token(&pool, "sdec@etu.ec-lyon.fr", &[GROUP_SDEC_FACTURATION_ADMIN]).await;
    let (member_id, _) = seed_directory(&pool, &token).await;

    let (status, _) = post(
        &pool,
        &token,
        "/member",
        json!({ "name": "Bob", "mandate": 2025, "role": "king" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("{BASE}/member/{member_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert!(list(&pool, &token, "/member").await.is_empty());
    let hidden = list(&pool, &token, "/member?include_hidden=true").await;
    assert_eq!(hidden.len(), 1);
    assert_eq!(hidden[0]["visible"], false);
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// A price change adds a row; the listing shows the latest prices.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_product_price_history(pool: PgPool) {
    let (_, token) =
        user_with_token(&pool, "sdec@etu.ec-lyon.fr", &[GROUP_SDEC_FACTURATION_ADMIN]).await;

    let (status, _) = post(
        &pool,
        &token,
        "/product",
        json!({
            "code": "A4-NB",
            "name": "Impression A4 noir",
            "individual_price": 0.10,
            "association_price": 0.08,
            "ae_price": 0.05,
            "category": "impression",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, product) = post(
        &pool,
        &token,
        "/product/A4-NB/price",
        json!({ "individual_price": 0.12, "association_price": 0.09, "ae_price": 0.06 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(product["data"]["name"], "Impression A4 noir");

    let products = list(&pool, &token, "/product").await;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["individual_price"], 0.12);

    let rows: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM sdec_facturation_product WHERE code = 'A4-NB'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(rows, 2);
}

/// Product codes are unique, prices positive and categories known.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_product_validation(pool: PgPool) {
    let (_, token) =
        user_with_token(&pool, "sdec@etu.ec-lyon.fr", &[GROUP_SDEC_FACTURATION_ADMIN]).await;
    let product = |code: &str, name: &str, price: f64, category: &str| {
        json!({
            "code": code,
            "name": name,
            "individual_price": price,
            "association_price": price,
            "ae_price": price,
            "category": category,
        })
    };

    let (status, _) = post(&pool, &token, "/product", product("ENV", "Enveloppe", 0.5, "enveloppe")).await;
    assert_eq!(status, StatusCode::CREATED);

    for body in [
        product("ENV", "Other name", 0.5, "enveloppe"),
        product("ENV2", "Enveloppe", 0.5, "enveloppe"),
        product("NEG", "Negative", -1.0, "divers"),
        product("CAT", "Unknown category", 1.0, "food"),
    ] {
        let (status, _) = post(&pool, &token, "/product", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("{BASE}/product/ENV"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(list(&pool, &token, "/product").await.is_empty());
}

// ---------------------------------------------------------------------------
// Orders and invoices
// ---------------------------------------------------------------------------

/// Orders reference existing associations and members.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_order(pool: PgPool) {
    let (_, token) =
        user_with_token(&pool, "sdec@etu.ec-lyon.fr", &[GROUP_SDEC_FACTURATION_ADMIN]).await;
    let (member_id, association_id) = seed_directory(&pool, &token).await;

    let (status, order) = post(
        &pool,
        &token,
        "/order",
        json!({ "association_id": association_id, "member_id": member_id, "order": "200 A4" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["data"]["valid"], true);

    let (status, _) = post(
        &pool,
        &token,
        "/order",
        json!({ "association_id": member_id, "member_id": member_id, "order": "x" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

/// Marking an invoice paid without a date stamps today.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_association_invoice_payment(pool: PgPool) {
    let (_, token) =
        user_with_token(&pool, "sdec@etu.ec-lyon.fr", &[GROUP_SDEC_FACTURATION_ADMIN]).await;
    let (member_id, association_id) = seed_directory(&pool, &token).await;
    let invoice = json!({
        "facture_number": "F2025-001",
        "member_id": member_id,
        "association_id": association_id,
        "price": 42.5,
        "start_date": "2025-01-01",
        "end_date": "2025-03-31",
    });

    let (status, created) = post(&pool, &token, "/invoice_association", invoice.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["paid"], false);

    let (status, _) = post(&pool, &token, "/invoice_association", invoice).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let uri = format!(
        "{BASE}/invoice_association/{}",
        created["data"]["id"].as_str().unwrap()
    );
    let response = patch_json_auth(app, &uri, &token, json!({ "paid": true })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["paid"], true);
    assert_eq!(
        json["data"]["payment_date"],
        Utc::now().date_naive().to_string()
    );
}

/// Individual invoices need a known customer category.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_individual_invoice(pool: PgPool) {
    let (_, token) =
        user_with_token(&pool, "sdec@etu.ec-lyon.fr", &[GROUP_SDEC_FACTURATION_ADMIN]).await;
    let (member_id, _) = seed_directory(&pool, &token).await;
    let invoice = |number: &str, category: &str| {
        json!({
            "facture_number": number,
            "member_id": member_id,
            "individual_order": "50 A3 couleur",
            "individual_category": category,
            "price": 12.0,
            "firstname": "Paul",
            "lastname": "Martin",
            "adresse": "36 avenue Guy de Collongue",
            "postal_code": "69130",
            "city": "Ecully",
            "country": "France",
        })
    };

    let (status, _) = post(&pool, &token, "/invoice_individual", invoice("I-1", "martian")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, created) = post(&pool, &token, "/invoice_individual", invoice("I-1", "profs")).await;
    assert_eq!(status, StatusCode::CREATED);

    let app = common::build_test_app(pool.clone());
    let uri = format!(
        "{BASE}/invoice_individual/{}",
        created["data"]["id"].as_str().unwrap()
    );
    let response = delete_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert!(list(&pool, &token, "/invoice_individual").await.is_empty());
    assert_eq!(
        list(&pool, &token, "/invoice_individual?include_hidden=true").await.len(),
        1
    );
}
