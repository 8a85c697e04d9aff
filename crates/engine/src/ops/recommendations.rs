//! Recommendation pipeline: trailing-quarter history in, a [`Report`] out.
//!
//! The operation never fails because of the generation API: every failure
//! mode downgrades to the canned default payload. Only database errors
//! propagate, and the HTTP layer absorbs those too.

use chrono::{DateTime, Months, Utc};
use sea_orm::{QueryFilter, TransactionTrait, prelude::*};

use crate::{
    Report, ResultEngine, Transaction,
    advisor::{build_prompt, default_report, parse_report},
    transactions,
};

use super::{Engine, with_tx};

impl Engine {
    /// Produces spending recommendations for the caller.
    ///
    /// Degrades to [`default_report`] when the trailing 3 months hold no
    /// transactions, the generation call fails, or the reply is unusable.
    pub async fn recommendations(&self, email: &str, now: DateTime<Utc>) -> ResultEngine<Report> {
        let three_months_ago = now.checked_sub_months(Months::new(3)).unwrap_or(now);

        let history: Vec<Transaction> = with_tx!(self, |db_tx| {
            let user_id = self.user_id_from_email(&db_tx, email).await?;
            let rows = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id))
                .filter(transactions::Column::Date.gte(three_months_ago))
                .filter(transactions::Column::Date.lte(now))
                .all(&db_tx)
                .await?;
            rows.into_iter()
                .map(Transaction::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })?;

        if history.is_empty() {
            return Ok(default_report());
        }

        let prompt = build_prompt(&history);
        match self.advisor.generate(&prompt).await {
            Ok(text) => Ok(parse_report(&text).unwrap_or_else(|| {
                tracing::warn!("unusable generation reply, serving default recommendations");
                default_report()
            })),
            Err(err) => {
                tracing::warn!("generation call failed, serving default recommendations: {err}");
                Ok(default_report())
            }
        }
    }
}
