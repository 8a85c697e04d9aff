//! Monthly budget alert scan.
//!
//! A timer-driven batch pass over every budget: when the owner's previous
//! calendar month of expenses exceeded the threshold, the budget row is
//! stamped with `last_alert_sent`. No notification is delivered.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{
    ResultEngine, TransactionKind, budgets, summary, transactions,
};

use super::{Engine, with_tx};

impl Engine {
    /// Runs one scan pass and returns the number of budgets flagged.
    ///
    /// A failure on one budget is logged and does not stop the pass.
    pub async fn budget_alert_scan(&self, now: DateTime<Utc>) -> ResultEngine<u64> {
        let window_end = summary::month_start(now);
        let window_start = summary::previous_month_start(now);

        let budget_rows = budgets::Entity::find().all(&self.database).await?;

        let mut flagged = 0;
        for budget in budget_rows {
            match self
                .check_budget(&budget, window_start, window_end, now)
                .await
            {
                Ok(true) => flagged += 1,
                Ok(false) => {}
                Err(err) => {
                    tracing::error!(
                        user_id = %budget.user_id,
                        "budget alert check failed: {err}"
                    );
                }
            }
        }

        Ok(flagged)
    }

    async fn check_budget(
        &self,
        budget: &budgets::Model,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> ResultEngine<bool> {
        with_tx!(self, |db_tx| {
            let expenses = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(budget.user_id.clone()))
                .filter(transactions::Column::Kind.eq(TransactionKind::Expense.as_str()))
                .filter(transactions::Column::Date.gte(window_start))
                .filter(transactions::Column::Date.lte(window_end))
                .all(&db_tx)
                .await?;

            let total_spent: i64 = expenses.iter().map(|t| t.amount_minor).sum();
            if total_spent <= budget.amount_minor {
                Ok(false)
            } else {
                tracing::warn!(
                    user_id = %budget.user_id,
                    spent_minor = total_spent,
                    budget_minor = budget.amount_minor,
                    "budget exceeded"
                );

                let active = budgets::ActiveModel {
                    id: ActiveValue::Set(budget.id.clone()),
                    last_alert_sent: ActiveValue::Set(Some(now)),
                    updated_at: ActiveValue::Set(now),
                    ..Default::default()
                };
                active.update(&db_tx).await?;
                Ok(true)
            }
        })
    }
}
