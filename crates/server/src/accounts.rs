//! Accounts API endpoints

use api_types::account::{AccountKind as ApiKind, AccountNew, AccountUpdate, AccountView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn map_kind(kind: engine::AccountKind) -> ApiKind {
    match kind {
        engine::AccountKind::Current => ApiKind::Current,
        engine::AccountKind::Savings => ApiKind::Savings,
        engine::AccountKind::Credit => ApiKind::Credit,
    }
}

fn map_kind_in(kind: ApiKind) -> engine::AccountKind {
    match kind {
        ApiKind::Current => engine::AccountKind::Current,
        ApiKind::Savings => engine::AccountKind::Savings,
        ApiKind::Credit => engine::AccountKind::Credit,
    }
}

pub(crate) fn view(account: engine::Account) -> AccountView {
    AccountView {
        id: account.id,
        name: account.name,
        kind: map_kind(account.kind),
        balance_minor: account.balance_minor,
        is_default: account.is_default,
        created_at: account.created_at,
        updated_at: account.updated_at,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<AccountNew>,
) -> Result<(StatusCode, Json<AccountView>), ServerError> {
    let account = state
        .engine
        .create_account(engine::CreateAccountCmd {
            email: user.email.clone(),
            name: payload.name,
            kind: map_kind_in(payload.kind),
            balance_minor: payload.balance_minor,
            is_default: payload.is_default,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(view(account))))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<AccountView>>, ServerError> {
    let accounts = state.engine.accounts(&user.email).await?;
    Ok(Json(accounts.into_iter().map(view).collect()))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountView>, ServerError> {
    let account = state.engine.account(&user.email, id).await?;
    Ok(Json(view(account)))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AccountUpdate>,
) -> Result<Json<AccountView>, ServerError> {
    let account = state
        .engine
        .update_account(engine::UpdateAccountCmd {
            email: user.email.clone(),
            account_id: id,
            name: payload.name,
            kind: map_kind_in(payload.kind),
            is_default: payload.is_default,
        })
        .await?;

    Ok(Json(view(account)))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_account(&user.email, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
