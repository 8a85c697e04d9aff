use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine, advisor::Advisor};

mod access;
mod accounts;
mod admin;
mod alerts;
mod budgets;
mod dashboard;
mod recommendations;
mod transactions;

pub use accounts::{CreateAccountCmd, UpdateAccountCmd};
pub use admin::{AdminAccount, AdminTransaction, AdminUser};
pub use transactions::{CreateTransactionCmd, UpdateTransactionCmd};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    advisor: Advisor,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    advisor: Option<Advisor>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Pass the generation-API client. Defaults to a disabled advisor, which
    /// keeps the recommendation feature on its canned fallback.
    pub fn advisor(mut self, advisor: Advisor) -> EngineBuilder {
        self.advisor = Some(advisor);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            advisor: self.advisor.unwrap_or_else(Advisor::disabled),
        })
    }
}
