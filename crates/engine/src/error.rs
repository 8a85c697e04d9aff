//! The module contains the errors the engine can raise.
//!
//! Every business-rule violation maps to one of a small closed set of tagged
//! variants, so callers and tests can discriminate without string matching:
//!
//! - [`NotFound`] the entity is absent, or not visible to the caller.
//! - [`Unauthorized`] the entity exists but is owned by someone else.
//! - [`Validation`] malformed or out-of-range input.
//! - [`ExternalService`] the generation API call failed; always absorbed
//!   into a default-value fallback before reaching the HTTP layer.
//!
//!  [`NotFound`]: EngineError::NotFound
//!  [`Unauthorized`]: EngineError::Unauthorized
//!  [`Validation`]: EngineError::Validation
//!  [`ExternalService`]: EngineError::ExternalService
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("unauthorized access to {0}")]
    Unauthorized(String),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("external service failure: {0}")]
    ExternalService(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Unauthorized(a), Self::Unauthorized(b)) => a == b,
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::ExternalService(a), Self::ExternalService(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
