//! Dashboard aggregation: a read-only snapshot recomputed on every call.

use chrono::{DateTime, Utc};
use sea_orm::{QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*};

use crate::{
    Account, Budget, ResultEngine, Transaction, accounts, budgets, summary,
    summary::DashboardSummary, transactions,
};

use super::{Engine, with_tx};

const RECENT_LIMIT: u64 = 10;

impl Engine {
    /// Computes the caller's dashboard over the accounts and the current
    /// month's transactions (`[month start, now]`, server clock).
    pub async fn dashboard(&self, email: &str, now: DateTime<Utc>) -> ResultEngine<DashboardSummary> {
        let month_start = summary::month_start(now);
        with_tx!(self, |db_tx| {
            let user_id = self.user_id_from_email(&db_tx, email).await?;

            let accounts = accounts::Entity::find()
                .filter(accounts::Column::UserId.eq(user_id.clone()))
                .order_by_asc(accounts::Column::CreatedAt)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Account::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;

            let monthly = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id.clone()))
                .filter(transactions::Column::Date.gte(month_start))
                .filter(transactions::Column::Date.lte(now))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Transaction::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;

            let recent = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id.clone()))
                .order_by_desc(transactions::Column::Date)
                .limit(RECENT_LIMIT)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Transaction::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;

            let budget = budgets::Entity::find()
                .filter(budgets::Column::UserId.eq(user_id))
                .one(&db_tx)
                .await?
                .map(Budget::try_from)
                .transpose()?;

            Ok(DashboardSummary::build(
                accounts,
                &monthly,
                recent,
                budget.as_ref(),
            ))
        })
    }
}
