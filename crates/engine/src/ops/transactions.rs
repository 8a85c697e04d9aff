//! Transaction operations and the balance maintenance that goes with them.
//!
//! Every mutation runs inside one DB transaction: the row write and the
//! owning account's balance write commit together or not at all.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, RecurringInterval, Transaction, TransactionKind, TransactionStatus,
    accounts, transactions, transactions::TransactionInput,
};

use super::{Engine, normalize_optional_text, normalize_required_text, with_tx};

pub struct CreateTransactionCmd {
    pub email: String,
    pub account_id: Uuid,
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub category: String,
    pub receipt_url: Option<String>,
    /// Defaults to `false` when unspecified.
    pub is_recurring: Option<bool>,
    pub recurring_interval: Option<RecurringInterval>,
    /// Defaults to `Completed` when unspecified.
    pub status: Option<TransactionStatus>,
}

pub struct UpdateTransactionCmd {
    pub email: String,
    pub transaction_id: Uuid,
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub category: String,
    pub receipt_url: Option<String>,
    pub is_recurring: Option<bool>,
    pub recurring_interval: Option<RecurringInterval>,
    pub status: Option<TransactionStatus>,
}

impl Engine {
    /// Records a new transaction against one of the caller's accounts and
    /// applies its balance effect once.
    pub async fn create_transaction(&self, cmd: CreateTransactionCmd) -> ResultEngine<Transaction> {
        let now = Utc::now();
        let category = normalize_required_text(&cmd.category, "category")?;
        with_tx!(self, |db_tx| {
            let user_id = self.user_id_from_email(&db_tx, &cmd.email).await?;
            let account = self
                .require_account_owned(&db_tx, cmd.account_id, &user_id)
                .await?;

            let tx = Transaction::new(
                TransactionInput {
                    kind: cmd.kind,
                    amount_minor: cmd.amount_minor,
                    description: normalize_optional_text(cmd.description.as_deref()),
                    date: cmd.date,
                    category,
                    receipt_url: normalize_optional_text(cmd.receipt_url.as_deref()),
                    is_recurring: cmd.is_recurring.unwrap_or(false),
                    recurring_interval: cmd.recurring_interval,
                    status: cmd.status.unwrap_or_default(),
                },
                user_id,
                cmd.account_id,
                now,
            )?;
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;

            self.apply_balance(&db_tx, &account.id, tx.kind, tx.amount_minor, tx.status, now)
                .await?;

            Ok(tx)
        })
    }

    /// Lists the caller's transactions, most recent date first.
    pub async fn list_transactions(&self, email: &str) -> ResultEngine<Vec<Transaction>> {
        with_tx!(self, |db_tx| {
            let user_id = self.user_id_from_email(&db_tx, email).await?;
            let rows = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id))
                .order_by_desc(transactions::Column::Date)
                .all(&db_tx)
                .await?;
            rows.into_iter()
                .map(Transaction::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Lists the transactions of one of the caller's accounts, most recent
    /// date first.
    pub async fn account_transactions(
        &self,
        email: &str,
        account_id: Uuid,
    ) -> ResultEngine<Vec<Transaction>> {
        with_tx!(self, |db_tx| {
            let user_id = self.user_id_from_email(&db_tx, email).await?;
            let account = self
                .require_account_owned(&db_tx, account_id, &user_id)
                .await?;
            let rows = transactions::Entity::find()
                .filter(transactions::Column::AccountId.eq(account.id))
                .order_by_desc(transactions::Column::Date)
                .all(&db_tx)
                .await?;
            rows.into_iter()
                .map(Transaction::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Returns a single transaction owned by the caller.
    pub async fn transaction(&self, email: &str, transaction_id: Uuid) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let user_id = self.user_id_from_email(&db_tx, email).await?;
            let model = self
                .require_transaction_owned(&db_tx, transaction_id, &user_id)
                .await?;
            Transaction::try_from(model)
        })
    }

    /// Rewrites a transaction and moves its balance effect from the old
    /// (kind, amount) pair to the new one.
    pub async fn update_transaction(&self, cmd: UpdateTransactionCmd) -> ResultEngine<Transaction> {
        let now = Utc::now();
        let category = normalize_required_text(&cmd.category, "category")?;
        if cmd.amount_minor <= 0 {
            return Err(EngineError::Validation(
                "amount_minor must be > 0".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            let user_id = self.user_id_from_email(&db_tx, &cmd.email).await?;
            let existing = self
                .require_transaction_owned(&db_tx, cmd.transaction_id, &user_id)
                .await?;

            let old_kind = TransactionKind::try_from(existing.kind.as_str())?;
            let old_amount = existing.amount_minor;
            let status = cmd.status.unwrap_or_default();

            let active = transactions::ActiveModel {
                id: ActiveValue::Set(existing.id.clone()),
                kind: ActiveValue::Set(cmd.kind.as_str().to_string()),
                amount_minor: ActiveValue::Set(cmd.amount_minor),
                description: ActiveValue::Set(normalize_optional_text(cmd.description.as_deref())),
                date: ActiveValue::Set(cmd.date),
                category: ActiveValue::Set(category),
                receipt_url: ActiveValue::Set(normalize_optional_text(cmd.receipt_url.as_deref())),
                is_recurring: ActiveValue::Set(cmd.is_recurring.unwrap_or(false)),
                recurring_interval: ActiveValue::Set(
                    cmd.recurring_interval.map(|i| i.as_str().to_string()),
                ),
                status: ActiveValue::Set(status.as_str().to_string()),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            };
            let updated = active.update(&db_tx).await?;

            // Revert the old effect first, then apply the new one. Skipping
            // the reversal or swapping the steps double-counts the balance.
            self.revert_balance(&db_tx, &existing.account_id, old_kind, old_amount, now)
                .await?;
            self.apply_balance(
                &db_tx,
                &existing.account_id,
                cmd.kind,
                cmd.amount_minor,
                status,
                now,
            )
            .await?;

            Transaction::try_from(updated)
        })
    }

    /// Removes a transaction after undoing its balance effect.
    pub async fn delete_transaction(&self, email: &str, transaction_id: Uuid) -> ResultEngine<()> {
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            let user_id = self.user_id_from_email(&db_tx, email).await?;
            let existing = self
                .require_transaction_owned(&db_tx, transaction_id, &user_id)
                .await?;

            let kind = TransactionKind::try_from(existing.kind.as_str())?;
            self.revert_balance(&db_tx, &existing.account_id, kind, existing.amount_minor, now)
                .await?;

            transactions::Entity::delete_by_id(existing.id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Applies a transaction's effect to its account. Pending and failed
    /// transactions never move the balance.
    async fn apply_balance(
        &self,
        db: &DatabaseTransaction,
        account_id: &str,
        kind: TransactionKind,
        amount_minor: i64,
        status: TransactionStatus,
        now: DateTime<Utc>,
    ) -> ResultEngine<()> {
        if status != TransactionStatus::Completed {
            return Ok(());
        }
        self.adjust_balance(db, account_id, kind.signed_amount(amount_minor), now)
            .await
    }

    /// Undoes a previously applied (kind, amount) pair: subtract for income,
    /// add for expense.
    async fn revert_balance(
        &self,
        db: &DatabaseTransaction,
        account_id: &str,
        kind: TransactionKind,
        amount_minor: i64,
        now: DateTime<Utc>,
    ) -> ResultEngine<()> {
        self.adjust_balance(db, account_id, -kind.signed_amount(amount_minor), now)
            .await
    }

    async fn adjust_balance(
        &self,
        db: &DatabaseTransaction,
        account_id: &str,
        delta_minor: i64,
        now: DateTime<Utc>,
    ) -> ResultEngine<()> {
        let account = accounts::Entity::find_by_id(account_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound("account".to_string()))?;

        let active = accounts::ActiveModel {
            id: ActiveValue::Set(account.id),
            balance_minor: ActiveValue::Set(account.balance_minor + delta_minor),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };
        active.update(db).await?;
        Ok(())
    }
}
