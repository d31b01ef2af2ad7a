//! Balance ledger domain logic.
//!
//! This module implements the storage-independent half of the top-up flow:
//! - Amount parsing and validation
//! - Validated top-up requests and the receipt returned to callers
//! - Error taxonomy shared by ledger and settings operations
//! - Text for the expense and notification rows a top-up writes
//! - Top-up service that turns a request into the rows to persist

pub mod error;
pub mod service;
pub mod templates;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use error::LedgerError;
pub use service::{LedgerService, TopUpPlan};
pub use templates::{NotificationDraft, NotificationKind};
pub use types::{TopUpReceipt, TopUpRequest};
pub use validation::{MAX_AMOUNT, normalize_code, parse_amount, validate_amount, validate_type};
