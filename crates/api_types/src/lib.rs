use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod account {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum AccountKind {
        Current,
        Savings,
        Credit,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountNew {
        pub name: String,
        pub kind: AccountKind,
        /// Opening balance in minor units; defaults to 0.
        pub balance_minor: Option<i64>,
        /// Defaults to false.
        pub is_default: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountUpdate {
        pub name: String,
        pub kind: AccountKind,
        /// Only `true` has an effect: it promotes this account to the
        /// user's default and demotes the previous one.
        pub is_default: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountView {
        pub id: Uuid,
        pub name: String,
        pub kind: AccountKind,
        pub balance_minor: i64,
        pub is_default: bool,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum TransactionKind {
        Income,
        Expense,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum TransactionStatus {
        Pending,
        Completed,
        Failed,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum RecurringInterval {
        Daily,
        Weekly,
        Monthly,
        Yearly,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub account_id: Uuid,
        pub kind: TransactionKind,
        /// Must be > 0. The kind carries the direction of the amount.
        pub amount_minor: i64,
        pub description: Option<String>,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub date: DateTime<FixedOffset>,
        pub category: String,
        pub receipt_url: Option<String>,
        /// Defaults to false.
        pub is_recurring: Option<bool>,
        pub recurring_interval: Option<RecurringInterval>,
        /// Defaults to COMPLETED.
        pub status: Option<TransactionStatus>,
    }

    /// Full-replace update; the owning account cannot be changed.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub kind: TransactionKind,
        pub amount_minor: i64,
        pub description: Option<String>,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub date: DateTime<FixedOffset>,
        pub category: String,
        pub receipt_url: Option<String>,
        pub is_recurring: Option<bool>,
        pub recurring_interval: Option<RecurringInterval>,
        pub status: Option<TransactionStatus>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub account_id: Uuid,
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
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod budget {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetUpsert {
        /// Monthly threshold in minor units; must be > 0.
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetView {
        pub id: Uuid,
        pub amount_minor: i64,
        pub last_alert_sent: Option<DateTime<Utc>>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod dashboard {
    use std::collections::HashMap;

    use super::*;
    use crate::{account::AccountView, transaction::TransactionView};

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DashboardView {
        pub accounts: Vec<AccountView>,
        pub total_balance_minor: i64,
        pub monthly_income_minor: i64,
        pub monthly_expense_minor: i64,
        /// Present only when the user has a budget.
        pub budget_amount_minor: Option<i64>,
        pub budget_spent_minor: Option<i64>,
        pub recent_transactions: Vec<TransactionView>,
        pub expenses_by_category: HashMap<String, i64>,
    }
}

pub mod recommendation {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecommendationResponse {
        pub recommendations: Vec<String>,
        pub summary: String,
    }
}

pub mod admin {
    use super::*;
    use crate::{account::AccountKind, transaction::*};

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum Role {
        User,
        Admin,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AdminUserView {
        pub id: String,
        pub email: String,
        pub name: Option<String>,
        pub role: Role,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AdminAccountView {
        pub id: Uuid,
        pub name: String,
        pub kind: AccountKind,
        pub balance_minor: i64,
        pub is_default: bool,
        pub user_id: String,
        pub user_email: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AdminTransactionView {
        pub id: Uuid,
        pub kind: TransactionKind,
        pub amount_minor: i64,
        pub description: Option<String>,
        pub date: DateTime<Utc>,
        pub category: String,
        pub is_recurring: bool,
        pub recurring_interval: Option<RecurringInterval>,
        pub status: TransactionStatus,
        pub account_id: Uuid,
        pub account_name: Option<String>,
        pub user_id: String,
        pub user_email: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}
