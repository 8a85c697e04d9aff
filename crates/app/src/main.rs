use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use settings::Database;

mod alerts;
mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;
    let mut tasks = tokio::task::JoinSet::new();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "gruzzolo={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.server.database).await?;

    let mut advisor = engine::Advisor::new(settings.advisor.as_ref().and_then(|a| a.api_key.clone()));
    if let Some(base_url) = settings.advisor.as_ref().and_then(|a| a.base_url.clone()) {
        advisor = advisor.with_base_url(base_url);
    }
    if let Some(model) = settings.advisor.as_ref().and_then(|a| a.model.clone()) {
        advisor = advisor.with_model(model);
    }

    let engine = Arc::new(
        engine::Engine::builder()
            .database(db.clone())
            .advisor(advisor)
            .build()
            .await?,
    );

    let bind = settings
        .server
        .bind
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    let server_engine = Arc::clone(&engine);
    tasks.spawn(async move {
        if let Err(err) = server::run_with_listener(server_engine, db, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    let alert_engine = Arc::clone(&engine);
    tasks.spawn(async move {
        alerts::run(alert_engine).await;
    });

    while tasks.join_next().await.is_some() {
        tasks.shutdown().await;
    }

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
