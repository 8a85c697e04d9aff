use chrono::{TimeZone, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, Database, DatabaseConnection};

use engine::{
    AccountKind, CreateAccountCmd, CreateTransactionCmd, Engine, TransactionKind, users,
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

async fn spend_last_month(engine: &Engine, amount_minor: i64) {
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
            amount_minor,
            description: None,
            date: Utc.with_ymd_and_hms(2026, 3, 15, 10, 0, 0).unwrap(),
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
async fn overspent_budgets_get_stamped() {
    let (engine, _db) = engine_with_db().await;
    spend_last_month(&engine, 15_000).await;
    engine.upsert_budget(ALICE, 10_000).await.unwrap();

    let scan_time = Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0).unwrap();
    let flagged = engine.budget_alert_scan(scan_time).await.unwrap();
    assert_eq!(flagged, 1);

    let budget = engine.budget(ALICE).await.unwrap();
    assert_eq!(budget.last_alert_sent, Some(scan_time));
}

#[tokio::test]
async fn budgets_within_threshold_are_left_alone() {
    let (engine, _db) = engine_with_db().await;
    spend_last_month(&engine, 5_000).await;
    engine.upsert_budget(ALICE, 10_000).await.unwrap();

    let scan_time = Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0).unwrap();
    let flagged = engine.budget_alert_scan(scan_time).await.unwrap();
    assert_eq!(flagged, 0);

    let budget = engine.budget(ALICE).await.unwrap();
    assert_eq!(budget.last_alert_sent, None);
}

#[tokio::test]
async fn the_scan_only_counts_the_previous_month() {
    let (engine, _db) = engine_with_db().await;
    // Spent in March; scanning for May looks at April only.
    spend_last_month(&engine, 50_000).await;
    engine.upsert_budget(ALICE, 10_000).await.unwrap();

    let scan_time = Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap();
    let flagged = engine.budget_alert_scan(scan_time).await.unwrap();
    assert_eq!(flagged, 0);
}
