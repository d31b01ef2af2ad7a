//! Property-based tests for top-up amount validation.

use gridx_shared::types::UserId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::TopUpRequest;
use super::validation::{parse_amount, validate_amount};

/// Strategy to generate a valid positive amount (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a zero or negative amount.
fn non_positive_amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(-cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every strictly positive two-decimal amount is accepted unchanged.
    #[test]
    fn prop_positive_amount_accepted(amount in positive_amount()) {
        let validated = validate_amount(amount, "Amount");
        prop_assert_eq!(validated.ok(), Some(amount));
    }

    /// Zero and negative amounts are rejected with `InvalidArgument`.
    #[test]
    fn prop_non_positive_amount_rejected(amount in non_positive_amount()) {
        let result = TopUpRequest::new(UserId::new(), amount, "topup", None, None);
        prop_assert!(
            matches!(result, Err(LedgerError::InvalidArgument(_))),
            "non-positive amount should be rejected, got: {:?}",
            result
        );
    }

    /// Parsing the textual form of a valid amount yields the same amount.
    #[test]
    fn prop_parse_matches_display(amount in positive_amount()) {
        let parsed = parse_amount(&amount.to_string(), "Amount");
        prop_assert_eq!(parsed.ok(), Some(amount));
    }

    /// Non-numeric text never parses.
    #[test]
    fn prop_alphabetic_text_rejected(text in "[a-zA-Z]{1,12}") {
        prop_assert!(matches!(
            parse_amount(&text, "Amount"),
            Err(LedgerError::InvalidArgument(_))
        ));
    }
}
