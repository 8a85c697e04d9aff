//! Transaction primitives.
//!
//! A `Transaction` records a single income or expense against one account.
//! The stored amount is always positive; the direction of the balance effect
//! is carried by [`TransactionKind`], never by the sign of the amount.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }

    /// Signed effect on an account balance: income adds, expense subtracts.
    pub fn signed_amount(self, amount_minor: i64) -> i64 {
        match self {
            Self::Income => amount_minor,
            Self::Expense => -amount_minor,
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "INCOME" => Ok(Self::Income),
            "EXPENSE" => Ok(Self::Expense),
            other => Err(EngineError::Validation(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

/// Settlement status. Only completed transactions move an account balance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    Pending,
    #[default]
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }
}

impl TryFrom<&str> for TransactionStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "PENDING" => Ok(Self::Pending),
            "COMPLETED" => Ok(Self::Completed),
            "FAILED" => Ok(Self::Failed),
            other => Err(EngineError::Validation(format!(
                "invalid transaction status: {other}"
            ))),
        }
    }
}

/// Recurrence cadence metadata. Stored and echoed back; the engine does not
/// process recurring transactions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecurringInterval {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RecurringInterval {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }
}

impl TryFrom<&str> for RecurringInterval {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "DAILY" => Ok(Self::Daily),
            "WEEKLY" => Ok(Self::Weekly),
            "MONTHLY" => Ok(Self::Monthly),
            "YEARLY" => Ok(Self::Yearly),
            other => Err(EngineError::Validation(format!(
                "invalid recurring interval: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub category: String,
    pub receipt_url: Option<String>,
    pub is_recurring: bool,
    pub recurring_interval: Option<RecurringInterval>,
    pub next_recurring_date: Option<DateTime<Utc>>,
    pub status: TransactionStatus,
    pub user_id: String,
    pub account_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct TransactionInput {
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub category: String,
    pub receipt_url: Option<String>,
    pub is_recurring: bool,
    pub recurring_interval: Option<RecurringInterval>,
    pub status: TransactionStatus,
}

impl Transaction {
    pub fn new(
        input: TransactionInput,
        user_id: String,
        account_id: Uuid,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if input.amount_minor <= 0 {
            return Err(EngineError::Validation(
                "amount_minor must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            kind: input.kind,
            amount_minor: input.amount_minor,
            description: input.description,
            date: input.date,
            category: input.category,
            receipt_url: input.receipt_url,
            is_recurring: input.is_recurring,
            recurring_interval: input.recurring_interval,
            next_recurring_date: None,
            status: input.status,
            user_id,
            account_id,
            created_at,
            updated_at: created_at,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kind: String,
    pub amount_minor: i64,
    pub description: Option<String>,
    pub date: DateTimeUtc,
    pub category: String,
    pub receipt_url: Option<String>,
    pub is_recurring: bool,
    pub recurring_interval: Option<String>,
    pub next_recurring_date: Option<DateTimeUtc>,
    pub status: String,
    pub user_id: String,
    pub account_id: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Accounts,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            amount_minor: ActiveValue::Set(tx.amount_minor),
            description: ActiveValue::Set(tx.description.clone()),
            date: ActiveValue::Set(tx.date),
            category: ActiveValue::Set(tx.category.clone()),
            receipt_url: ActiveValue::Set(tx.receipt_url.clone()),
            is_recurring: ActiveValue::Set(tx.is_recurring),
            recurring_interval: ActiveValue::Set(
                tx.recurring_interval.map(|i| i.as_str().to_string()),
            ),
            next_recurring_date: ActiveValue::Set(tx.next_recurring_date),
            status: ActiveValue::Set(tx.status.as_str().to_string()),
            user_id: ActiveValue::Set(tx.user_id.clone()),
            account_id: ActiveValue::Set(tx.account_id.to_string()),
            created_at: ActiveValue::Set(tx.created_at),
            updated_at: ActiveValue::Set(tx.updated_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("transaction".to_string()))?,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            amount_minor: model.amount_minor,
            description: model.description,
            date: model.date,
            category: model.category,
            receipt_url: model.receipt_url,
            is_recurring: model.is_recurring,
            recurring_interval: model
                .recurring_interval
                .as_deref()
                .map(RecurringInterval::try_from)
                .transpose()?,
            next_recurring_date: model.next_recurring_date,
            status: TransactionStatus::try_from(model.status.as_str())?,
            user_id: model.user_id,
            account_id: Uuid::parse_str(&model.account_id)
                .map_err(|_| EngineError::NotFound("account".to_string()))?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_amount_follows_kind() {
        assert_eq!(TransactionKind::Income.signed_amount(250), 250);
        assert_eq!(TransactionKind::Expense.signed_amount(250), -250);
    }

    #[test]
    fn kind_round_trips_through_storage_form() {
        for kind in [TransactionKind::Income, TransactionKind::Expense] {
            assert_eq!(TransactionKind::try_from(kind.as_str()), Ok(kind));
        }
        assert!(TransactionKind::try_from("TRANSFER").is_err());
    }

    #[test]
    fn new_rejects_non_positive_amounts() {
        let input = TransactionInput {
            kind: TransactionKind::Expense,
            amount_minor: 0,
            description: None,
            date: chrono::Utc::now(),
            category: "food".to_string(),
            receipt_url: None,
            is_recurring: false,
            recurring_interval: None,
            status: TransactionStatus::Completed,
        };
        let err = Transaction::new(input, "u1".to_string(), Uuid::new_v4(), chrono::Utc::now())
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }
}
