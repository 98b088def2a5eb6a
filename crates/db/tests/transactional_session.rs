//! Commit semantics of the request-wide transactional session.
//!
//! - `commit` alone persists nothing
//! - `commit_manually` persists everything executed so far
//! - dropping the session rolls back the open transaction
//! - `finish` commits

use hyperion_db::models::group::CreateGroup;
use hyperion_db::repositories::GroupRepo;
use hyperion_db::TransactionalSession;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

fn new_group(name: &str) -> CreateGroup {
    CreateGroup {
        name: name.to_string(),
        description: None,
    }
}

async fn group_exists(pool: &PgPool, name: &str) -> bool {
    GroupRepo::find_by_name(pool, name).await.unwrap().is_some()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_commit_is_a_no_op(pool: PgPool) {
    let mut session = TransactionalSession::begin(&pool).await.unwrap();
    GroupRepo::create(&mut *session, &new_group("chess"))
        .await
        .unwrap();
    session.commit().await.unwrap();

    // Visible inside the session, not outside.
    assert!(GroupRepo::find_by_name(&mut *session, "chess")
        .await
        .unwrap()
        .is_some());
    assert!(!group_exists(&pool, "chess").await);

    drop(session);
    assert!(!group_exists(&pool, "chess").await);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_commit_manually_persists(pool: PgPool) {
    let mut session = TransactionalSession::begin(&pool).await.unwrap();
    GroupRepo::create(&mut *session, &new_group("go"))
        .await
        .unwrap();
    session.commit_manually().await.unwrap();
    assert!(group_exists(&pool, "go").await);

    // Work after the manual commit is still rolled back on drop.
    GroupRepo::create(&mut *session, &new_group("bridge"))
        .await
        .unwrap();
    drop(session);

    assert!(group_exists(&pool, "go").await);
    assert!(!group_exists(&pool, "bridge").await);
}

/// A manual commit never needs a second connection, so it succeeds on a
/// pool that only has one.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_commit_manually_on_single_connection(pool: PgPool) {
    let single = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_with(pool.connect_options().as_ref().clone())
        .await
        .unwrap();

    let mut session = TransactionalSession::begin(&single).await.unwrap();
    GroupRepo::create(&mut *session, &new_group("checkers"))
        .await
        .unwrap();
    session.commit_manually().await.unwrap();
    GroupRepo::create(&mut *session, &new_group("backgammon"))
        .await
        .unwrap();
    session.finish().await.unwrap();

    assert!(group_exists(&pool, "checkers").await);
    assert!(group_exists(&pool, "backgammon").await);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_finish_commits(pool: PgPool) {
    let mut session = TransactionalSession::begin(&pool).await.unwrap();
    GroupRepo::create(&mut *session, &new_group("poker"))
        .await
        .unwrap();
    session.finish().await.unwrap();

    assert!(group_exists(&pool, "poker").await);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_explicit_rollback(pool: PgPool) {
    let mut session = TransactionalSession::begin(&pool).await.unwrap();
    GroupRepo::create(&mut *session, &new_group("tarot"))
        .await
        .unwrap();
    session.rollback().await.unwrap();

    assert!(!group_exists(&pool, "tarot").await);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_statement_rolls_back_whole_request(pool: PgPool) {
    let mut session = TransactionalSession::begin(&pool).await.unwrap();
    GroupRepo::create(&mut *session, &new_group("rugby"))
        .await
        .unwrap();
    // Duplicate name violates uq_core_group_name.
    let duplicate = GroupRepo::create(&mut *session, &new_group("rugby")).await;
    assert!(duplicate.is_err());
    drop(session);

    assert!(!group_exists(&pool, "rugby").await);
}
