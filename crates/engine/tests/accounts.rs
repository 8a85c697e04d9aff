use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, Database, DatabaseConnection};

use engine::{
    Account, AccountKind, CreateAccountCmd, Engine, EngineError, UpdateAccountCmd, users,
};
use migration::MigratorTrait;

const ALICE: &str = "alice@example.com";

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let now = Utc::now();
    users::ActiveModel {
        id: Set("u-alice".to_string()),
        email: Set(ALICE.to_string()),
        password: Set("password".to_string()),
        name: Set(None),
        role: Set("USER".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await
    .unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn open_account(engine: &Engine, name: &str, is_default: bool) -> Account {
    engine
        .create_account(CreateAccountCmd {
            email: ALICE.to_string(),
            name: name.to_string(),
            kind: AccountKind::Current,
            balance_minor: None,
            is_default: Some(is_default),
        })
        .await
        .unwrap()
}

async fn default_count(engine: &Engine) -> usize {
    engine
        .accounts(ALICE)
        .await
        .unwrap()
        .iter()
        .filter(|a| a.is_default)
        .count()
}

#[tokio::test]
async fn creating_a_new_default_demotes_the_previous_one() {
    let (engine, _db) = engine_with_db().await;

    let first = open_account(&engine, "First", true).await;
    assert!(first.is_default);

    let second = open_account(&engine, "Second", true).await;
    assert!(second.is_default);

    let first = engine.account(ALICE, first.id).await.unwrap();
    assert!(!first.is_default);
    assert_eq!(default_count(&engine).await, 1);
}

#[tokio::test]
async fn promoting_through_update_demotes_the_previous_default() {
    let (engine, _db) = engine_with_db().await;

    let first = open_account(&engine, "First", true).await;
    let second = open_account(&engine, "Second", false).await;

    engine
        .update_account(UpdateAccountCmd {
            email: ALICE.to_string(),
            account_id: second.id,
            name: "Second".to_string(),
            kind: AccountKind::Savings,
            is_default: Some(true),
        })
        .await
        .unwrap();

    let first = engine.account(ALICE, first.id).await.unwrap();
    let second = engine.account(ALICE, second.id).await.unwrap();
    assert!(!first.is_default);
    assert!(second.is_default);
    assert_eq!(second.kind, AccountKind::Savings);
    assert_eq!(default_count(&engine).await, 1);
}

#[tokio::test]
async fn update_never_demotes_and_never_touches_the_balance() {
    let (engine, _db) = engine_with_db().await;

    let account = engine
        .create_account(CreateAccountCmd {
            email: ALICE.to_string(),
            name: "Main".to_string(),
            kind: AccountKind::Current,
            balance_minor: Some(12_345),
            is_default: Some(true),
        })
        .await
        .unwrap();

    let updated = engine
        .update_account(UpdateAccountCmd {
            email: ALICE.to_string(),
            account_id: account.id,
            name: "Renamed".to_string(),
            kind: AccountKind::Credit,
            is_default: Some(false),
        })
        .await
        .unwrap();

    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.kind, AccountKind::Credit);
    // The flag only transitions false -> true through update.
    assert!(updated.is_default);
    assert_eq!(updated.balance_minor, 12_345);
}

#[tokio::test]
async fn default_stays_unique_across_a_mixed_sequence() {
    let (engine, _db) = engine_with_db().await;

    let a = open_account(&engine, "A", true).await;
    let b = open_account(&engine, "B", true).await;
    let c = open_account(&engine, "C", false).await;

    engine
        .update_account(UpdateAccountCmd {
            email: ALICE.to_string(),
            account_id: c.id,
            name: "C".to_string(),
            kind: AccountKind::Current,
            is_default: Some(true),
        })
        .await
        .unwrap();
    engine
        .update_account(UpdateAccountCmd {
            email: ALICE.to_string(),
            account_id: a.id,
            name: "A".to_string(),
            kind: AccountKind::Current,
            is_default: Some(true),
        })
        .await
        .unwrap();

    assert_eq!(default_count(&engine).await, 1);
    assert!(engine.account(ALICE, a.id).await.unwrap().is_default);
    assert!(!engine.account(ALICE, b.id).await.unwrap().is_default);
    assert!(!engine.account(ALICE, c.id).await.unwrap().is_default);
}

#[tokio::test]
async fn deleted_accounts_disappear() {
    let (engine, _db) = engine_with_db().await;

    let account = open_account(&engine, "Gone", false).await;
    engine.delete_account(ALICE, account.id).await.unwrap();

    let err = engine.account(ALICE, account.id).await.unwrap_err();
    assert_eq!(err, EngineError::NotFound("account".to_string()));
    assert!(engine.accounts(ALICE).await.unwrap().is_empty());
}

#[tokio::test]
async fn blank_names_are_rejected() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_account(CreateAccountCmd {
            email: ALICE.to_string(),
            name: "   ".to_string(),
            kind: AccountKind::Current,
            balance_minor: None,
            is_default: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}
