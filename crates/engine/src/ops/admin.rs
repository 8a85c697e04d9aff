//! Admin read-through listings: full tables joined with owner identity.
//! No business rules live here; role enforcement happens at the HTTP layer.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Account, ResultEngine, Role, Transaction, accounts, transactions, users,
};

use super::{Engine, with_tx};

pub struct AdminUser {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

pub struct AdminAccount {
    pub account: Account,
    pub user_email: Option<String>,
}

pub struct AdminTransaction {
    pub transaction: Transaction,
    pub account_name: Option<String>,
    pub user_email: Option<String>,
}

impl Engine {
    pub async fn list_all_users(&self) -> ResultEngine<Vec<AdminUser>> {
        with_tx!(self, |db_tx| {
            let rows = users::Entity::find().all(&db_tx).await?;
            rows.into_iter()
                .map(|user| {
                    Ok(AdminUser {
                        id: user.id,
                        email: user.email,
                        name: user.name,
                        role: Role::try_from(user.role.as_str())?,
                        created_at: user.created_at,
                    })
                })
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    pub async fn list_all_accounts(&self) -> ResultEngine<Vec<AdminAccount>> {
        with_tx!(self, |db_tx| {
            let emails = self.user_emails(&db_tx).await?;
            let rows = accounts::Entity::find().all(&db_tx).await?;
            rows.into_iter()
                .map(|model| {
                    let account = Account::try_from(model)?;
                    let user_email = emails.get(&account.user_id).cloned();
                    Ok(AdminAccount {
                        account,
                        user_email,
                    })
                })
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    pub async fn list_all_transactions(&self) -> ResultEngine<Vec<AdminTransaction>> {
        with_tx!(self, |db_tx| {
            let emails = self.user_emails(&db_tx).await?;
            let account_names: HashMap<Uuid, String> = accounts::Entity::find()
                .all(&db_tx)
                .await?
                .into_iter()
                .filter_map(|a| Uuid::parse_str(&a.id).ok().map(|id| (id, a.name)))
                .collect();

            let rows = transactions::Entity::find().all(&db_tx).await?;
            rows.into_iter()
                .map(|model| {
                    let transaction = Transaction::try_from(model)?;
                    let account_name = account_names.get(&transaction.account_id).cloned();
                    let user_email = emails.get(&transaction.user_id).cloned();
                    Ok(AdminTransaction {
                        transaction,
                        account_name,
                        user_email,
                    })
                })
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    async fn user_emails(
        &self,
        db: &sea_orm::DatabaseTransaction,
    ) -> ResultEngine<HashMap<String, String>> {
        Ok(users::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|u| (u.id, u.email))
            .collect())
    }
}
