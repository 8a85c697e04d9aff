use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::Engine as _;
use chrono::Utc;
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, Database, DatabaseConnection};
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::{Engine, users};
use migration::MigratorTrait;
use server::ServerState;

const ALICE: &str = "alice@example.com";
const BOB: &str = "bob@example.com";
const ADMIN: &str = "admin@example.com";
const PASSWORD: &str = "password";

async fn seed_user(db: &DatabaseConnection, id: &str, email: &str, role: &str) {
    let now = Utc::now();
    users::ActiveModel {
        id: Set(id.to_string()),
        email: Set(email.to_string()),
        password: Set(PASSWORD.to_string()),
        name: Set(None),
        role: Set(role.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap();
}

async fn setup() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    seed_user(&db, "u-alice", ALICE, "USER").await;
    seed_user(&db, "u-bob", BOB, "USER").await;
    seed_user(&db, "u-root", ADMIN, "ADMIN").await;

    let engine = Arc::new(
        Engine::builder()
            .database(db.clone())
            .build()
            .await
            .unwrap(),
    );
    server::router(ServerState { engine, db })
}

fn basic_auth(email: &str, password: &str) -> String {
    format!(
        "Basic {}",
        base64::engine::general_purpose::STANDARD.encode(format!("{email}:{password}"))
    )
}

fn request(method: &str, uri: &str, email: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(email) = email {
        builder = builder.header(header::AUTHORIZATION, basic_auth(email, PASSWORD));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_account(app: &Router, email: &str, balance_minor: i64) -> String {
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/accounts",
            Some(email),
            Some(json!({"name": "Bank", "kind": "CURRENT", "balance_minor": balance_minor})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    read_json(response).await["id"].as_str().unwrap().to_string()
}

async fn account_balance(app: &Router, email: &str, account_id: &str) -> i64 {
    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/accounts/{account_id}"),
            Some(email),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    read_json(response).await["balance_minor"].as_i64().unwrap()
}

#[tokio::test]
async fn requests_without_valid_credentials_are_rejected() {
    let app = setup().await;

    // No Authorization header at all.
    let response = app
        .clone()
        .oneshot(request("GET", "/accounts", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Wrong password.
    let req = Request::builder()
        .method("GET")
        .uri("/accounts")
        .header(header::AUTHORIZATION, basic_auth(ALICE, "wrong"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn account_crud_round_trip() {
    let app = setup().await;
    let account_id = create_account(&app, ALICE, 0).await;

    let response = app
        .clone()
        .oneshot(request("GET", "/accounts", Some(ALICE), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed = read_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/accounts/{account_id}"),
            Some(ALICE),
            Some(json!({"name": "Renamed", "kind": "SAVINGS"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = read_json(response).await;
    assert_eq!(updated["name"], "Renamed");
    assert_eq!(updated["kind"], "SAVINGS");

    let response = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/accounts/{account_id}"),
            Some(ALICE),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/accounts/{account_id}"),
            Some(ALICE),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn transaction_lifecycle_keeps_the_balance_consistent() {
    let app = setup().await;
    let account_id = create_account(&app, ALICE, 1000).await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/transactions",
            Some(ALICE),
            Some(json!({
                "account_id": account_id,
                "kind": "EXPENSE",
                "amount_minor": 100,
                "date": Utc::now().to_rfc3339(),
                "category": "food",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let tx = read_json(response).await;
    let tx_id = tx["id"].as_str().unwrap().to_string();
    assert_eq!(tx["status"], "COMPLETED");
    assert_eq!(account_balance(&app, ALICE, &account_id).await, 900);

    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/transactions/{tx_id}"),
            Some(ALICE),
            Some(json!({
                "kind": "INCOME",
                "amount_minor": 50,
                "date": Utc::now().to_rfc3339(),
                "category": "refund",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(account_balance(&app, ALICE, &account_id).await, 1050);

    let response = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/transactions/{tx_id}"),
            Some(ALICE),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(account_balance(&app, ALICE, &account_id).await, 1000);
}

#[tokio::test]
async fn foreign_transactions_read_as_missing_and_stay_untouched() {
    let app = setup().await;
    let account_id = create_account(&app, ALICE, 0).await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/transactions",
            Some(ALICE),
            Some(json!({
                "account_id": account_id,
                "kind": "INCOME",
                "amount_minor": 500,
                "date": Utc::now().to_rfc3339(),
                "category": "salary",
            })),
        ))
        .await
        .unwrap();
    let tx_id = read_json(response).await["id"].as_str().unwrap().to_string();

    for method in ["GET", "DELETE"] {
        let response = app
            .clone()
            .oneshot(request(
                method,
                &format!("/transactions/{tx_id}"),
                Some(BOB),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/transactions/{tx_id}"),
            Some(BOB),
            Some(json!({
                "kind": "EXPENSE",
                "amount_minor": 999,
                "date": Utc::now().to_rfc3339(),
                "category": "theft",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert_eq!(account_balance(&app, ALICE, &account_id).await, 500);
}

#[tokio::test]
async fn business_rule_failures_map_to_400() {
    let app = setup().await;
    let account_id = create_account(&app, ALICE, 0).await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/transactions",
            Some(ALICE),
            Some(json!({
                "account_id": account_id,
                "kind": "INCOME",
                "amount_minor": 0,
                "date": Utc::now().to_rfc3339(),
                "category": "salary",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn recommendation_endpoint_always_answers_200_with_a_payload() {
    let app = setup().await;

    let response = app
        .clone()
        .oneshot(request("POST", "/ai/recommendations", Some(ALICE), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 4);
    assert_eq!(
        body["summary"],
        "Start tracking your finances to get personalized recommendations"
    );
}

#[tokio::test]
async fn budget_round_trip() {
    let app = setup().await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/budgets",
            Some(ALICE),
            Some(json!({"amount_minor": 50_000})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["amount_minor"], 50_000);

    // Upsert: same user, new amount, still one budget.
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/budgets",
            Some(ALICE),
            Some(json!({"amount_minor": 70_000})),
        ))
        .await
        .unwrap();
    assert_eq!(read_json(response).await["amount_minor"], 70_000);

    let response = app
        .clone()
        .oneshot(request("GET", "/budgets", Some(ALICE), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["amount_minor"], 70_000);

    let response = app
        .clone()
        .oneshot(request("DELETE", "/budgets", Some(ALICE), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(request("GET", "/budgets", Some(ALICE), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dashboard_reports_monthly_sums() {
    let app = setup().await;
    let account_id = create_account(&app, ALICE, 0).await;

    for (kind, amount, category) in [
        ("INCOME", 5000, "salary"),
        ("EXPENSE", 1200, "food"),
        ("EXPENSE", 300, "transport"),
    ] {
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/transactions",
                Some(ALICE),
                Some(json!({
                    "account_id": account_id,
                    "kind": kind,
                    "amount_minor": amount,
                    "date": Utc::now().to_rfc3339(),
                    "category": category,
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(request("GET", "/dashboard", Some(ALICE), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["monthly_income_minor"], 5000);
    assert_eq!(body["monthly_expense_minor"], 1500);
    assert_eq!(body["total_balance_minor"], 3500);
    assert_eq!(body["expenses_by_category"]["food"], 1200);
    assert_eq!(body["recent_transactions"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn admin_listings_are_role_gated() {
    let app = setup().await;
    create_account(&app, ALICE, 100).await;

    for uri in ["/admin/users", "/admin/accounts", "/admin/transactions"] {
        let response = app
            .clone()
            .oneshot(request("GET", uri, Some(ALICE), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    let response = app
        .clone()
        .oneshot(request("GET", "/admin/users", Some(ADMIN), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await.as_array().unwrap().len(), 3);

    let response = app
        .clone()
        .oneshot(request("GET", "/admin/accounts", Some(ADMIN), None))
        .await
        .unwrap();
    let accounts = read_json(response).await;
    assert_eq!(accounts.as_array().unwrap().len(), 1);
    assert_eq!(accounts[0]["user_email"], ALICE);
}
