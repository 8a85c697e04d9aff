//! Transactions API endpoints

use api_types::transaction::{
    RecurringInterval as ApiInterval, TransactionKind as ApiKind, TransactionNew,
    TransactionStatus as ApiStatus, TransactionUpdate, TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

pub(crate) fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Income => ApiKind::Income,
        engine::TransactionKind::Expense => ApiKind::Expense,
    }
}

fn map_kind_in(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Income => engine::TransactionKind::Income,
        ApiKind::Expense => engine::TransactionKind::Expense,
    }
}

fn map_status(status: engine::TransactionStatus) -> ApiStatus {
    match status {
        engine::TransactionStatus::Pending => ApiStatus::Pending,
        engine::TransactionStatus::Completed => ApiStatus::Completed,
        engine::TransactionStatus::Failed => ApiStatus::Failed,
    }
}

fn map_status_in(status: ApiStatus) -> engine::TransactionStatus {
    match status {
        ApiStatus::Pending => engine::TransactionStatus::Pending,
        ApiStatus::Completed => engine::TransactionStatus::Completed,
        ApiStatus::Failed => engine::TransactionStatus::Failed,
    }
}

fn map_interval(interval: engine::RecurringInterval) -> ApiInterval {
    match interval {
        engine::RecurringInterval::Daily => ApiInterval::Daily,
        engine::RecurringInterval::Weekly => ApiInterval::Weekly,
        engine::RecurringInterval::Monthly => ApiInterval::Monthly,
        engine::RecurringInterval::Yearly => ApiInterval::Yearly,
    }
}

fn map_interval_in(interval: ApiInterval) -> engine::RecurringInterval {
    match interval {
        ApiInterval::Daily => engine::RecurringInterval::Daily,
        ApiInterval::Weekly => engine::RecurringInterval::Weekly,
        ApiInterval::Monthly => engine::RecurringInterval::Monthly,
        ApiInterval::Yearly => engine::RecurringInterval::Yearly,
    }
}

pub(crate) fn view(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        account_id: tx.account_id,
        kind: map_kind(tx.kind),
        amount_minor: tx.amount_minor,
        description: tx.description,
        date: tx.date,
        category: tx.category,
        receipt_url: tx.receipt_url,
        is_recurring: tx.is_recurring,
        recurring_interval: tx.recurring_interval.map(map_interval),
        next_recurring_date: tx.next_recurring_date,
        status: map_status(tx.status),
        created_at: tx.created_at,
        updated_at: tx.updated_at,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let tx = state
        .engine
        .create_transaction(engine::CreateTransactionCmd {
            email: user.email.clone(),
            account_id: payload.account_id,
            kind: map_kind_in(payload.kind),
            amount_minor: payload.amount_minor,
            description: payload.description,
            date: payload.date.with_timezone(&Utc),
            category: payload.category,
            receipt_url: payload.receipt_url,
            is_recurring: payload.is_recurring,
            recurring_interval: payload.recurring_interval.map(map_interval_in),
            status: payload.status.map(map_status_in),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(view(tx))))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let txs = state.engine.list_transactions(&user.email).await?;
    Ok(Json(txs.into_iter().map(view).collect()))
}

pub async fn list_for_account(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(account_id): Path<Uuid>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let txs = state
        .engine
        .account_transactions(&user.email, account_id)
        .await?;
    Ok(Json(txs.into_iter().map(view).collect()))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state.engine.transaction(&user.email, id).await?;
    Ok(Json(view(tx)))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state
        .engine
        .update_transaction(engine::UpdateTransactionCmd {
            email: user.email.clone(),
            transaction_id: id,
            kind: map_kind_in(payload.kind),
            amount_minor: payload.amount_minor,
            description: payload.description,
            date: payload.date.with_timezone(&Utc),
            category: payload.category,
            receipt_url: payload.receipt_url,
            is_recurring: payload.is_recurring,
            recurring_interval: payload.recurring_interval.map(map_interval_in),
            status: payload.status.map(map_status_in),
        })
        .await?;

    Ok(Json(view(tx)))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_transaction(&user.email, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
