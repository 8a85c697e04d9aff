//! Admin API endpoints: read-through listings, ADMIN role required.

use api_types::admin::{AdminAccountView, AdminTransactionView, AdminUserView, Role as ApiRole};
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState, transactions};

fn map_role(role: engine::Role) -> ApiRole {
    match role {
        engine::Role::User => ApiRole::User,
        engine::Role::Admin => ApiRole::Admin,
    }
}

fn map_account_kind(kind: engine::AccountKind) -> api_types::account::AccountKind {
    match kind {
        engine::AccountKind::Current => api_types::account::AccountKind::Current,
        engine::AccountKind::Savings => api_types::account::AccountKind::Savings,
        engine::AccountKind::Credit => api_types::account::AccountKind::Credit,
    }
}

pub async fn users(
    State(state): State<ServerState>,
) -> Result<Json<Vec<AdminUserView>>, ServerError> {
    let rows = state.engine.list_all_users().await?;
    Ok(Json(
        rows.into_iter()
            .map(|row| AdminUserView {
                id: row.id,
                email: row.email,
                name: row.name,
                role: map_role(row.role),
                created_at: row.created_at,
            })
            .collect(),
    ))
}

pub async fn accounts(
    State(state): State<ServerState>,
) -> Result<Json<Vec<AdminAccountView>>, ServerError> {
    let rows = state.engine.list_all_accounts().await?;
    Ok(Json(
        rows.into_iter()
            .map(|row| AdminAccountView {
                id: row.account.id,
                name: row.account.name,
                kind: map_account_kind(row.account.kind),
                balance_minor: row.account.balance_minor,
                is_default: row.account.is_default,
                user_id: row.account.user_id,
                user_email: row.user_email,
                created_at: row.account.created_at,
                updated_at: row.account.updated_at,
            })
            .collect(),
    ))
}

pub async fn transactions(
    State(state): State<ServerState>,
) -> Result<Json<Vec<AdminTransactionView>>, ServerError> {
    let rows = state.engine.list_all_transactions().await?;
    Ok(Json(
        rows.into_iter()
            .map(|row| {
                let user_id = row.transaction.user_id.clone();
                let tx = transactions::view(row.transaction);
                AdminTransactionView {
                    id: tx.id,
                    kind: tx.kind,
                    amount_minor: tx.amount_minor,
                    description: tx.description,
                    date: tx.date,
                    category: tx.category,
                    is_recurring: tx.is_recurring,
                    recurring_interval: tx.recurring_interval,
                    status: tx.status,
                    account_id: tx.account_id,
                    account_name: row.account_name,
                    user_id,
                    user_email: row.user_email,
                    created_at: tx.created_at,
                    updated_at: tx.updated_at,
                }
            })
            .collect(),
    ))
}
