use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, Database, DatabaseConnection};

use engine::{
    AccountKind, Advisor, CreateAccountCmd, CreateTransactionCmd, Engine, TransactionKind,
    advisor::default_report, users,
};
use migration::MigratorTrait;

const ALICE: &str = "alice@example.com";

async fn engine_with_db(advisor: Advisor) -> (Engine, DatabaseConnection) {
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
        .advisor(advisor)
        .build()
        .await
        .unwrap();
    (engine, db)
}

#[tokio::test]
async fn empty_history_serves_the_default_payload() {
    let (engine, _db) = engine_with_db(Advisor::disabled()).await;

    let report = engine.recommendations(ALICE, Utc::now()).await.unwrap();
    assert_eq!(report, default_report());
    assert_eq!(report.recommendations.len(), 4);
}

async fn seed_history(engine: &Engine) {
    let account = engine
        .create_account(CreateAccountCmd {
            email: ALICE.to_string(),
            name: "Bank".to_string(),
            kind: AccountKind::Current,
            balance_minor: Some(0),
            is_default: None,
        })
        .await
        .unwrap();
    engine
        .create_transaction(CreateTransactionCmd {
            email: ALICE.to_string(),
            account_id: account.id,
            kind: TransactionKind::Expense,
            amount_minor: 4200,
            description: None,
            date: Utc::now(),
            category: "food".to_string(),
            receipt_url: None,
            is_recurring: None,
            recurring_interval: None,
            status: None,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn unreachable_generation_api_degrades_to_the_default_payload() {
    let (engine, _db) = engine_with_db(Advisor::disabled()).await;
    seed_history(&engine).await;

    // History exists, but the advisor has no credentials: still a 4-item
    // default, never an error.
    let report = engine.recommendations(ALICE, Utc::now()).await.unwrap();
    assert_eq!(report, default_report());
}

#[tokio::test]
async fn placeholder_api_key_counts_as_unconfigured() {
    let advisor = Advisor::new(Some("your-gemini-api-key".to_string()));
    let (engine, _db) = engine_with_db(advisor).await;
    seed_history(&engine).await;

    let report = engine.recommendations(ALICE, Utc::now()).await.unwrap();
    assert_eq!(report, default_report());
}
