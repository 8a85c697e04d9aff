//! Dashboard API endpoint

use api_types::dashboard::DashboardView;
use axum::{Extension, Json, extract::State};
use chrono::Utc;

use crate::{ServerError, accounts, server::ServerState, transactions, user};

pub async fn summary(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<DashboardView>, ServerError> {
    let summary = state.engine.dashboard(&user.email, Utc::now()).await?;

    Ok(Json(DashboardView {
        accounts: summary.accounts.into_iter().map(accounts::view).collect(),
        total_balance_minor: summary.total_balance_minor,
        monthly_income_minor: summary.monthly_income_minor,
        monthly_expense_minor: summary.monthly_expense_minor,
        budget_amount_minor: summary.budget_amount_minor,
        budget_spent_minor: summary.budget_spent_minor,
        recent_transactions: summary
            .recent_transactions
            .into_iter()
            .map(transactions::view)
            .collect(),
        expenses_by_category: summary.expenses_by_category,
    }))
}
