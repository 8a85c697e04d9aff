pub use accounts::{Account, AccountKind};
pub use advisor::{Advisor, Report};
pub use budgets::Budget;
pub use error::EngineError;
pub use ops::{
    AdminAccount, AdminTransaction, AdminUser, CreateAccountCmd, CreateTransactionCmd, Engine,
    EngineBuilder, UpdateAccountCmd, UpdateTransactionCmd,
};
pub use summary::DashboardSummary;
pub use transactions::{RecurringInterval, Transaction, TransactionKind, TransactionStatus};
pub use users::Role;

pub mod accounts;
pub mod advisor;
pub mod budgets;
mod error;
mod ops;
pub mod summary;
pub mod transactions;
pub mod users;

type ResultEngine<T> = Result<T, EngineError>;
