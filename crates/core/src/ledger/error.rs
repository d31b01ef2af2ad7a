//! Ledger error taxonomy.
//!
//! Every top-up, balance and auto top-up settings operation fails with one
//! of these four kinds. Validation failures are raised before storage is
//! touched; the two storage kinds carry internal detail for logs only.

use gridx_shared::AppError;
use gridx_shared::types::UserId;
use thiserror::Error;

/// Errors that can occur during ledger and settings operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Bad amount, frequency, or missing field.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The referenced user does not exist.
    #[error("User not found: {0}")]
    NotFound(UserId),

    /// Storage could not be reached or did not answer in time.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A step inside the database transaction failed and everything was rolled back.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),
}

impl LedgerError {
    /// Shorthand for an `InvalidArgument` error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Returns true if the caller cannot know whether the write committed.
    ///
    /// A timeout may fire after the server already committed, so such a
    /// top-up must be treated as possibly applied.
    #[must_use]
    pub const fn is_indeterminate(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_))
    }
}

/// Client-facing text for a write whose outcome cannot be known.
pub const OUTCOME_UNKNOWN_MESSAGE: &str =
    "The request may have been applied. Check your balance or history before retrying";

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        if err.is_indeterminate() {
            return Self::OutcomeUnknown(OUTCOME_UNKNOWN_MESSAGE.to_string());
        }
        match err {
            LedgerError::InvalidArgument(msg) => Self::Validation(msg),
            LedgerError::NotFound(_) => Self::NotFound("User not found".to_string()),
            LedgerError::StorageUnavailable(_) | LedgerError::TransactionFailed(_) => {
                Self::Database("The operation could not be completed".to_string())
            }
        }
    }
}
