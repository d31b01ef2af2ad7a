//! Ledger domain types for top-up processing.

use chrono::{DateTime, Utc};
use gridx_shared::types::{ExpenseId, NotificationId, TopUpId, UserId};
use rust_decimal::Decimal;
use serde::Serialize;

use super::error::LedgerError;
use super::validation::{normalize_code, parse_amount, validate_amount, validate_type};

/// A validated top-up request.
///
/// Can only be built through [`TopUpRequest::new`] or [`TopUpRequest::parse`],
/// so the amount is always strictly positive and the type tag non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopUpRequest {
    user_id: UserId,
    amount: Decimal,
    top_up_type: String,
    promo_code: Option<String>,
    voucher_code: Option<String>,
}

impl TopUpRequest {
    /// Validates a top-up with an already numeric amount.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidArgument` if any field is invalid.
    pub fn new(
        user_id: UserId,
        amount: Decimal,
        top_up_type: &str,
        promo_code: Option<&str>,
        voucher_code: Option<&str>,
    ) -> Result<Self, LedgerError> {
        Ok(Self {
            user_id,
            amount: validate_amount(amount, "Amount")?,
            top_up_type: validate_type(top_up_type)?,
            promo_code: normalize_code(promo_code, "Promo code")?,
            voucher_code: normalize_code(voucher_code, "Voucher code")?,
        })
    }

    /// Validates a top-up whose amount arrives as text.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidArgument` if any field is invalid.
    pub fn parse(
        user_id: UserId,
        raw_amount: &str,
        top_up_type: &str,
        promo_code: Option<&str>,
        voucher_code: Option<&str>,
    ) -> Result<Self, LedgerError> {
        let amount = parse_amount(raw_amount, "Amount")?;
        Self::new(user_id, amount, top_up_type, promo_code, voucher_code)
    }

    /// The user being credited.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// The strictly positive amount to credit.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// Category tag, e.g. `topup` or `electricity`.
    #[must_use]
    pub fn top_up_type(&self) -> &str {
        &self.top_up_type
    }

    /// Optional promotional code.
    #[must_use]
    pub fn promo_code(&self) -> Option<&str> {
        self.promo_code.as_deref()
    }

    /// Optional voucher code.
    #[must_use]
    pub fn voucher_code(&self) -> Option<&str> {
        self.voucher_code.as_deref()
    }
}

/// Result of a committed top-up.
///
/// Carries every generated id plus the balance after the credit so callers
/// can render a consistent confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopUpReceipt {
    /// Ledger entry id.
    pub top_up_id: TopUpId,
    /// Correlated expense record id.
    pub expense_id: ExpenseId,
    /// Success notification id.
    pub notification_id: NotificationId,
    /// User that was credited.
    pub user_id: UserId,
    /// Amount credited.
    pub amount: Decimal,
    /// Balance after the credit.
    pub new_balance: Decimal,
    /// Timestamp shared by all rows written.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_trims_and_normalizes() {
        let req = TopUpRequest::new(
            UserId::new(),
            dec!(50.00),
            " electricity ",
            Some(""),
            Some(" V-123 "),
        )
        .unwrap();

        assert_eq!(req.amount(), dec!(50));
        assert_eq!(req.top_up_type(), "electricity");
        assert_eq!(req.promo_code(), None);
        assert_eq!(req.voucher_code(), Some("V-123"));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        let result = TopUpRequest::parse(UserId::new(), "fifty", "topup", None, None);
        assert!(matches!(result, Err(LedgerError::InvalidArgument(_))));
    }

    #[test]
    fn test_rejects_empty_type() {
        let result = TopUpRequest::new(UserId::new(), dec!(10), "", None, None);
        assert!(matches!(result, Err(LedgerError::InvalidArgument(_))));
    }

    #[test]
    fn test_amount_checked_before_type() {
        let err = TopUpRequest::new(UserId::new(), dec!(-1), "", None, None).unwrap_err();
        assert!(err.to_string().contains("Amount"));
    }
}
