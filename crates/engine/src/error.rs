//! The module contains the errors the engine can return.
//!
//! Expected domain-rule failures are never panics: they come back as
//! [`Rejected`] carrying the per-field [`Violations`], so the caller can fix
//! the payload and resubmit. The remaining variants are:
//!
//! - [`KeyNotFound`] when a referenced club, player or coach does not exist.
//! - [`Conflict`] when a club ledger changed under a concurrent mutation;
//!   the whole unit of work was rolled back and can be retried.
//! - [`Database`] / [`Corrupted`] for storage failures.
//!
//!  [`Rejected`]: EngineError::Rejected
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Conflict`]: EngineError::Conflict
//!  [`Database`]: EngineError::Database
//!  [`Corrupted`]: EngineError::Corrupted
//!  [`Violations`]: crate::Violations
use sea_orm::DbErr;
use thiserror::Error;

use crate::Violations;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Validation failed: {0}")]
    Rejected(Violations),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Concurrent update: {0}")]
    Conflict(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("Corrupted data: {0}")]
    Corrupted(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Returns `true` when repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Returns the violations of a rejected mutation.
    pub fn violations(&self) -> Option<&Violations> {
        match self {
            Self::Rejected(violations) => Some(violations),
            _ => None,
        }
    }
}

impl From<Violations> for EngineError {
    fn from(value: Violations) -> Self {
        Self::Rejected(value)
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Rejected(a), Self::Rejected(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::Corrupted(a), Self::Corrupted(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
