//! Budget operations. Each user carries at most one budget row.

use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};

use crate::{Budget, EngineError, ResultEngine, budgets};

use super::{Engine, with_tx};

impl Engine {
    /// Creates the caller's budget or updates the amount of the existing
    /// one.
    pub async fn upsert_budget(&self, email: &str, amount_minor: i64) -> ResultEngine<Budget> {
        let now = Utc::now();
        if amount_minor <= 0 {
            return Err(EngineError::Validation(
                "amount_minor must be > 0".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            let user_id = self.user_id_from_email(&db_tx, email).await?;

            match self.find_budget(&db_tx, &user_id).await? {
                Some(existing) => {
                    let active = budgets::ActiveModel {
                        id: ActiveValue::Set(existing.id.clone()),
                        amount_minor: ActiveValue::Set(amount_minor),
                        updated_at: ActiveValue::Set(now),
                        ..Default::default()
                    };
                    let updated = active.update(&db_tx).await?;
                    Budget::try_from(updated)
                }
                None => {
                    let budget = Budget::new(amount_minor, user_id, now);
                    budgets::ActiveModel::from(&budget).insert(&db_tx).await?;
                    Ok(budget)
                }
            }
        })
    }

    /// Returns the caller's budget.
    pub async fn budget(&self, email: &str) -> ResultEngine<Budget> {
        with_tx!(self, |db_tx| {
            let user_id = self.user_id_from_email(&db_tx, email).await?;
            let model = self
                .find_budget(&db_tx, &user_id)
                .await?
                .ok_or_else(|| EngineError::NotFound("budget".to_string()))?;
            Budget::try_from(model)
        })
    }

    /// Removes the caller's budget.
    pub async fn delete_budget(&self, email: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let user_id = self.user_id_from_email(&db_tx, email).await?;
            let model = self
                .find_budget(&db_tx, &user_id)
                .await?
                .ok_or_else(|| EngineError::NotFound("budget".to_string()))?;
            budgets::Entity::delete_by_id(model.id).exec(&db_tx).await?;
            Ok(())
        })
    }

    async fn find_budget(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
    ) -> ResultEngine<Option<budgets::Model>> {
        budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id))
            .one(db)
            .await
            .map_err(Into::into)
    }
}
