//! Budgets API endpoints

use api_types::budget::{BudgetUpsert, BudgetView};
use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{ServerError, server::ServerState, user};

fn view(budget: engine::Budget) -> BudgetView {
    BudgetView {
        id: budget.id,
        amount_minor: budget.amount_minor,
        last_alert_sent: budget.last_alert_sent,
        created_at: budget.created_at,
        updated_at: budget.updated_at,
    }
}

/// Creates or updates the caller's single budget.
pub async fn upsert(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetUpsert>,
) -> Result<Json<BudgetView>, ServerError> {
    let budget = state
        .engine
        .upsert_budget(&user.email, payload.amount_minor)
        .await?;
    Ok(Json(view(budget)))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<BudgetView>, ServerError> {
    let budget = state.engine.budget(&user.email).await?;
    Ok(Json(view(budget)))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_budget(&user.email).await?;
    Ok(StatusCode::NO_CONTENT)
}
