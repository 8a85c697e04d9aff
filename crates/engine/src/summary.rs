//! Pure aggregation over loaded rows.
//!
//! The dashboard and the budget alert scan both derive their numbers from
//! in-memory slices of accounts/transactions; nothing here touches the
//! database, so the arithmetic is testable in isolation.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Utc};

use crate::{Account, Budget, Transaction, TransactionKind};

/// Snapshot returned by the dashboard operation. Recomputed on every call;
/// nothing is persisted.
#[derive(Clone, Debug)]
pub struct DashboardSummary {
    pub accounts: Vec<Account>,
    pub total_balance_minor: i64,
    pub monthly_income_minor: i64,
    pub monthly_expense_minor: i64,
    pub budget_amount_minor: Option<i64>,
    pub budget_spent_minor: Option<i64>,
    pub recent_transactions: Vec<Transaction>,
    pub expenses_by_category: HashMap<String, i64>,
}

impl DashboardSummary {
    pub fn build(
        accounts: Vec<Account>,
        monthly: &[Transaction],
        recent: Vec<Transaction>,
        budget: Option<&Budget>,
    ) -> Self {
        let monthly_expense_minor = sum_by_kind(monthly, TransactionKind::Expense);
        Self {
            total_balance_minor: total_balance_minor(&accounts),
            monthly_income_minor: sum_by_kind(monthly, TransactionKind::Income),
            monthly_expense_minor,
            budget_amount_minor: budget.map(|b| b.amount_minor),
            budget_spent_minor: budget.map(|_| monthly_expense_minor),
            expenses_by_category: expenses_by_category(monthly),
            accounts,
            recent_transactions: recent,
        }
    }
}

pub fn total_balance_minor(accounts: &[Account]) -> i64 {
    accounts.iter().map(|a| a.balance_minor).sum()
}

pub fn sum_by_kind(transactions: &[Transaction], kind: TransactionKind) -> i64 {
    transactions
        .iter()
        .filter(|t| t.kind == kind)
        .map(|t| t.amount_minor)
        .sum()
}

/// Groups the expense transactions by category and sums their amounts.
/// Categories without an expense in the slice are absent from the map.
pub fn expenses_by_category(transactions: &[Transaction]) -> HashMap<String, i64> {
    let mut totals = HashMap::new();
    for tx in transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Expense)
    {
        *totals.entry(tx.category.clone()).or_insert(0) += tx.amount_minor;
    }
    totals
}

/// First instant of the month containing `now`, in UTC.
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let date = now.date_naive();
    let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date);
    first.and_time(NaiveTime::MIN).and_utc()
}

/// First instant of the month before the one containing `now`.
pub fn previous_month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let current = month_start(now);
    let last_of_previous = current
        .checked_sub_days(Days::new(1))
        .unwrap_or(current);
    month_start(last_of_previous)
}
