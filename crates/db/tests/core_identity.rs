//! Users, schools, groups and memberships against a real database.

mod common;

use chrono::{Duration, Utc};
use hyperion_core::groups::{ACCOUNT_EXTERNAL, GROUP_ADMIN, GROUP_STUDENT};
use hyperion_core::schools::SCHOOL_NO_SCHOOL;
use hyperion_core::search::like_pattern;
use hyperion_db::models::group::{CreateGroup, CreateMembership, UpdateGroup};
use hyperion_db::models::school::CreateSchool;
use hyperion_db::models::session::CreateSession;
use hyperion_db::models::user::{CreateUnconfirmedUser, UpdateUser};
use hyperion_db::repositories::{
    GroupRepo, MembershipRepo, RecoverRequestRepo, SchoolRepo, SessionRepo, UnconfirmedUserRepo,
    UserRepo,
};
use sqlx::PgPool;

use common::{insert_user, new_user};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_then_find_user(pool: PgPool) {
    let created = UserRepo::create(&pool, &new_user("jane@etu.ec-lyon.fr", "Doe", "Jane"))
        .await
        .unwrap();

    let found = UserRepo::find_by_id(&pool, created.id).await.unwrap().unwrap();
    assert_eq!(found.email, "jane@etu.ec-lyon.fr");
    assert_eq!(found.firstname, "Jane");
    assert_eq!(found.promo, Some(2023));

    let by_email = UserRepo::find_by_email(&pool, "JANE@etu.ec-lyon.fr")
        .await
        .unwrap();
    assert_eq!(by_email.map(|u| u.id), Some(created.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_is_rejected(pool: PgPool) {
    insert_user(&pool, "dup@etu.ec-lyon.fr").await;
    let err = UserRepo::create(&pool, &new_user("dup@etu.ec-lyon.fr", "X", "Y"))
        .await
        .unwrap_err();
    let constraint = err
        .as_database_error()
        .and_then(|e| e.constraint().map(str::to_string));
    assert_eq!(constraint.as_deref(), Some("uq_core_user_email"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_user_keeps_absent_fields(pool: PgPool) {
    let user = insert_user(&pool, "upd@etu.ec-lyon.fr").await;
    let update = UpdateUser {
        nickname: Some("JD".to_string()),
        ..Default::default()
    };
    let updated = UserRepo::update(&pool, user.id, &update).await.unwrap().unwrap();
    assert_eq!(updated.nickname.as_deref(), Some("JD"));
    assert_eq!(updated.name, user.name);
    assert_eq!(updated.birthday, user.birthday);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_matches_names_and_nicknames(pool: PgPool) {
    let mut input = new_user("ada@etu.ec-lyon.fr", "Lovelace", "Ada");
    input.nickname = Some("countess".to_string());
    UserRepo::create(&pool, &input).await.unwrap();
    UserRepo::create(&pool, &new_user("alan@etu.ec-lyon.fr", "Turing", "Alan"))
        .await
        .unwrap();

    let hits = UserRepo::search(&pool, &like_pattern("love"), 10).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].firstname, "Ada");

    let hits = UserRepo::search(&pool, &like_pattern("COUNT"), 10).await.unwrap();
    assert_eq!(hits.len(), 1);

    let hits = UserRepo::search(&pool, &like_pattern("a"), 1).await.unwrap();
    assert_eq!(hits.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_by_account_type_and_group(pool: PgPool) {
    let student = insert_user(&pool, "s@etu.ec-lyon.fr").await;
    let mut external = new_user("e@example.com", "Ext", "Ernal");
    external.account_type = ACCOUNT_EXTERNAL.to_string();
    let external = UserRepo::create(&pool, &external).await.unwrap();
    MembershipRepo::create_if_missing(&pool, student.id, GROUP_STUDENT)
        .await
        .unwrap();

    let types = vec![ACCOUNT_EXTERNAL.to_string()];
    let only_external = UserRepo::list(&pool, Some(&types), None, 50, 0).await.unwrap();
    assert_eq!(only_external.len(), 1);
    assert_eq!(only_external[0].id, external.id);

    let students = UserRepo::list(&pool, None, Some(GROUP_STUDENT), 50, 0)
        .await
        .unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].id, student.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_user_removes_memberships_and_sessions(pool: PgPool) {
    let user = insert_user(&pool, "gone@etu.ec-lyon.fr").await;
    MembershipRepo::create_if_missing(&pool, user.id, GROUP_ADMIN)
        .await
        .unwrap();
    SessionRepo::create(
        &pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: "hash".to_string(),
            expires_at: Utc::now() + Duration::days(7),
        },
    )
    .await
    .unwrap();

    let mut conn = pool.acquire().await.unwrap();
    assert!(UserRepo::delete(&mut conn, user.id).await.unwrap());
    assert!(!UserRepo::delete(&mut conn, user.id).await.unwrap());

    let members = MembershipRepo::members(&pool, GROUP_ADMIN).await.unwrap();
    assert!(members.is_empty());
    assert!(SessionRepo::redeem(&pool, "hash").await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Pending accounts and recovery
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unconfirmed_users_deleted_by_email(pool: PgPool) {
    for token in ["tok-1", "tok-2"] {
        UnconfirmedUserRepo::create(
            &pool,
            &CreateUnconfirmedUser {
                email: "new@etu.ec-lyon.fr".to_string(),
                account_type: "student".to_string(),
                school_id: SCHOOL_NO_SCHOOL,
                activation_token: token.to_string(),
                expire_on: Utc::now() + Duration::hours(24),
            },
        )
        .await
        .unwrap();
    }

    let found = UnconfirmedUserRepo::find_by_token(&pool, "tok-2").await.unwrap();
    assert!(found.is_some());

    let removed = UnconfirmedUserRepo::delete_by_email(&pool, "new@etu.ec-lyon.fr")
        .await
        .unwrap();
    assert_eq!(removed, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_recover_request_replaces_previous(pool: PgPool) {
    let user = insert_user(&pool, "lost@etu.ec-lyon.fr").await;
    let expire = Utc::now() + Duration::hours(12);
    RecoverRequestRepo::upsert(&pool, user.id, "first", expire).await.unwrap();
    RecoverRequestRepo::upsert(&pool, user.id, "second", expire).await.unwrap();

    assert!(RecoverRequestRepo::find_by_token(&pool, "first")
        .await
        .unwrap()
        .is_none());
    let request = RecoverRequestRepo::find_by_token(&pool, "second")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(request.user_id, user.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refresh_token_redeems_once(pool: PgPool) {
    let user = insert_user(&pool, "sess@etu.ec-lyon.fr").await;
    let session = SessionRepo::create(
        &pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: "abc".to_string(),
            expires_at: Utc::now() + Duration::days(7),
        },
    )
    .await
    .unwrap();

    let redeemed = SessionRepo::redeem(&pool, "abc").await.unwrap().unwrap();
    assert_eq!(redeemed.id, session.id);
    assert!(redeemed.is_revoked);
    assert!(SessionRepo::redeem(&pool, "abc").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_expired_session_cannot_be_redeemed(pool: PgPool) {
    let user = insert_user(&pool, "old@etu.ec-lyon.fr").await;
    SessionRepo::create(
        &pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: "stale".to_string(),
            expires_at: Utc::now() - Duration::minutes(1),
        },
    )
    .await
    .unwrap();

    assert!(SessionRepo::redeem(&pool, "stale").await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Groups, memberships, schools
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_group_lifecycle(pool: PgPool) {
    let group = GroupRepo::create(
        &pool,
        &CreateGroup {
            name: "BDS".to_string(),
            description: Some("Sports office".to_string()),
        },
    )
    .await
    .unwrap();

    let renamed = GroupRepo::update(
        &pool,
        group.id,
        &UpdateGroup {
            name: Some("BDS 2026".to_string()),
            description: None,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(renamed.name, "BDS 2026");
    assert_eq!(renamed.description.as_deref(), Some("Sports office"));

    let user = insert_user(&pool, "member@etu.ec-lyon.fr").await;
    MembershipRepo::create(
        &pool,
        &CreateMembership {
            user_id: user.id,
            group_id: group.id,
            description: None,
        },
    )
    .await
    .unwrap();
    assert!(MembershipRepo::exists(&pool, user.id, group.id).await.unwrap());
    assert_eq!(
        MembershipRepo::emails_in_group(&pool, group.id).await.unwrap(),
        vec!["member@etu.ec-lyon.fr".to_string()]
    );

    let mut conn = pool.acquire().await.unwrap();
    assert!(GroupRepo::delete(&mut conn, group.id).await.unwrap());
    assert!(!MembershipRepo::exists(&pool, user.id, group.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_if_missing_is_idempotent(pool: PgPool) {
    let user = insert_user(&pool, "twice@etu.ec-lyon.fr").await;
    assert!(MembershipRepo::create_if_missing(&pool, user.id, GROUP_STUDENT)
        .await
        .unwrap());
    assert!(!MembershipRepo::create_if_missing(&pool, user.id, GROUP_STUDENT)
        .await
        .unwrap());
    assert!(MembershipRepo::exists_any(&pool, user.id, &[GROUP_ADMIN, GROUP_STUDENT])
        .await
        .unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_school_delete_moves_users_to_no_school(pool: PgPool) {
    let school = SchoolRepo::create(
        &pool,
        &CreateSchool {
            name: "insa".to_string(),
            email_regex: r"^.*@insa-lyon\.fr$".to_string(),
        },
    )
    .await
    .unwrap();
    let mut input = new_user("a@insa-lyon.fr", "A", "B");
    input.school_id = school.id;
    let user = UserRepo::create(&pool, &input).await.unwrap();

    let mut conn = pool.acquire().await.unwrap();
    assert!(SchoolRepo::delete(&mut conn, school.id).await.unwrap());

    let moved = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(moved.school_id, SCHOOL_NO_SCHOOL);
}
