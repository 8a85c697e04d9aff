//! Account operations.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Account, AccountKind, ResultEngine, accounts};

use super::{Engine, normalize_required_text, with_tx};

pub struct CreateAccountCmd {
    pub email: String,
    pub name: String,
    pub kind: AccountKind,
    /// Defaults to zero when unspecified.
    pub balance_minor: Option<i64>,
    /// Defaults to `false` when unspecified.
    pub is_default: Option<bool>,
}

pub struct UpdateAccountCmd {
    pub email: String,
    pub account_id: Uuid,
    pub name: String,
    pub kind: AccountKind,
    /// The flag only transitions false -> true through this operation;
    /// `Some(false)` and `None` leave it untouched.
    pub is_default: Option<bool>,
}

impl Engine {
    /// Creates an account for the caller. When the new account is flagged as
    /// default, the sibling default (if any) is cleared in the same DB
    /// transaction, keeping at most one default per user.
    pub async fn create_account(&self, cmd: CreateAccountCmd) -> ResultEngine<Account> {
        let now = Utc::now();
        let name = normalize_required_text(&cmd.name, "account name")?;
        with_tx!(self, |db_tx| {
            let user_id = self.user_id_from_email(&db_tx, &cmd.email).await?;

            let account = Account::new(
                name,
                cmd.kind,
                cmd.balance_minor.unwrap_or(0),
                cmd.is_default.unwrap_or(false),
                user_id.clone(),
                now,
            );

            if account.is_default {
                self.clear_default_account(&db_tx, &user_id, now).await?;
            }

            accounts::ActiveModel::from(&account).insert(&db_tx).await?;
            Ok(account)
        })
    }

    /// Lists the caller's accounts in creation order.
    pub async fn accounts(&self, email: &str) -> ResultEngine<Vec<Account>> {
        with_tx!(self, |db_tx| {
            let user_id = self.user_id_from_email(&db_tx, email).await?;
            let rows = accounts::Entity::find()
                .filter(accounts::Column::UserId.eq(user_id))
                .order_by_asc(accounts::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            rows.into_iter()
                .map(Account::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Returns one of the caller's accounts.
    pub async fn account(&self, email: &str, account_id: Uuid) -> ResultEngine<Account> {
        with_tx!(self, |db_tx| {
            let user_id = self.user_id_from_email(&db_tx, email).await?;
            let model = self
                .require_account_owned(&db_tx, account_id, &user_id)
                .await?;
            Account::try_from(model)
        })
    }

    /// Renames/retypes an account and optionally promotes it to default.
    ///
    /// The balance is never written through this operation; it belongs to
    /// the transaction ops.
    pub async fn update_account(&self, cmd: UpdateAccountCmd) -> ResultEngine<Account> {
        let now = Utc::now();
        let name = normalize_required_text(&cmd.name, "account name")?;
        with_tx!(self, |db_tx| {
            let user_id = self.user_id_from_email(&db_tx, &cmd.email).await?;
            let existing = self
                .require_account_owned(&db_tx, cmd.account_id, &user_id)
                .await?;

            let promote = cmd.is_default == Some(true) && !existing.is_default;
            if promote {
                self.clear_default_account(&db_tx, &user_id, now).await?;
            }

            let mut active = accounts::ActiveModel {
                id: ActiveValue::Set(existing.id.clone()),
                name: ActiveValue::Set(name),
                kind: ActiveValue::Set(cmd.kind.as_str().to_string()),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            };
            if promote {
                active.is_default = ActiveValue::Set(true);
            }
            let updated = active.update(&db_tx).await?;

            Account::try_from(updated)
        })
    }

    /// Deletes one of the caller's accounts; its transactions go with it.
    pub async fn delete_account(&self, email: &str, account_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let user_id = self.user_id_from_email(&db_tx, email).await?;
            let existing = self
                .require_account_owned(&db_tx, account_id, &user_id)
                .await?;
            accounts::Entity::delete_by_id(existing.id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    async fn clear_default_account(
        &self,
        db: &sea_orm::DatabaseTransaction,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<()> {
        let current = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id))
            .filter(accounts::Column::IsDefault.eq(true))
            .one(db)
            .await?;

        if let Some(model) = current {
            let active = accounts::ActiveModel {
                id: ActiveValue::Set(model.id),
                is_default: ActiveValue::Set(false),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            };
            active.update(db).await?;
        }
        Ok(())
    }
}
