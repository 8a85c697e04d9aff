//! Identity resolution and ownership checks shared by the operations.
//!
//! Ownership is always decided against the id resolved from the caller's
//! authenticated email; client-supplied user ids are never trusted.

use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, accounts, transactions, users};

use super::Engine;

impl Engine {
    /// Resolves an authenticated email to the stored user id.
    pub(super) async fn user_id_from_email(
        &self,
        db: &DatabaseTransaction,
        email: &str,
    ) -> ResultEngine<String> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(db)
            .await?
            .map(|user| user.id)
            .ok_or_else(|| EngineError::NotFound("user".to_string()))
    }

    /// Loads an account only if it belongs to `user_id`. A missing row and a
    /// foreign row are indistinguishable to the caller.
    pub(super) async fn require_account_owned(
        &self,
        db: &DatabaseTransaction,
        account_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<accounts::Model> {
        accounts::Entity::find_by_id(account_id.to_string())
            .filter(accounts::Column::UserId.eq(user_id))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound("account".to_string()))
    }

    /// Loads a transaction and checks it belongs to `user_id`.
    ///
    /// Unlike accounts, existence and ownership are checked separately here:
    /// a foreign transaction is `Unauthorized`, not `NotFound`, so tests can
    /// discriminate. The HTTP layer conflates both into 404.
    pub(super) async fn require_transaction_owned(
        &self,
        db: &DatabaseTransaction,
        transaction_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<transactions::Model> {
        let model = transactions::Entity::find_by_id(transaction_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound("transaction".to_string()))?;
        if model.user_id != user_id {
            return Err(EngineError::Unauthorized("transaction".to_string()));
        }
        Ok(model)
    }
}
