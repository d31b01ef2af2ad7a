//! Input validation for ledger operations.
//!
//! All checks here run before any storage access.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::error::LedgerError;

/// Largest amount that fits the `DECIMAL(14,2)` storage columns (999999999999.99).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

/// Maximum length of a top-up type tag.
pub const MAX_TYPE_LEN: usize = 50;

/// Maximum length of a promo or voucher code.
pub const MAX_CODE_LEN: usize = 50;

/// Parses a client-supplied amount.
///
/// Accepts plain decimals (`"50"`, `"49.99"`) and scientific notation
/// (`"1e3"`). Surrounding whitespace is ignored. The result is validated
/// with [`validate_amount`].
///
/// # Errors
///
/// Returns `LedgerError::InvalidArgument` if the text is not a number or
/// the number is not a valid amount.
pub fn parse_amount(raw: &str, field: &str) -> Result<Decimal, LedgerError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::invalid(format!("{field} is required")));
    }

    let amount = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| LedgerError::invalid(format!("{field} must be a number")))?;

    validate_amount(amount, field)
}

/// Validates that an amount is strictly positive, has at most two decimal
/// places and fits the storage columns.
///
/// # Errors
///
/// Returns `LedgerError::InvalidArgument` describing the first violated rule.
pub fn validate_amount(amount: Decimal, field: &str) -> Result<Decimal, LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::invalid(format!(
            "{field} must be greater than zero"
        )));
    }

    let amount = amount.normalize();
    if amount.scale() > 2 {
        return Err(LedgerError::invalid(format!(
            "{field} cannot have more than two decimal places"
        )));
    }

    if amount > MAX_AMOUNT {
        return Err(LedgerError::invalid(format!("{field} is too large")));
    }

    Ok(amount)
}

/// Validates and trims a top-up type tag.
///
/// # Errors
///
/// Returns `LedgerError::InvalidArgument` if the tag is blank or too long.
pub fn validate_type(raw: &str) -> Result<String, LedgerError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::invalid("Top-up type is required"));
    }
    if trimmed.chars().count() > MAX_TYPE_LEN {
        return Err(LedgerError::invalid(format!(
            "Top-up type cannot exceed {MAX_TYPE_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Normalizes an optional promo or voucher code.
///
/// Blank codes are treated as absent.
///
/// # Errors
///
/// Returns `LedgerError::InvalidArgument` if the code is too long.
pub fn normalize_code(raw: Option<&str>, field: &str) -> Result<Option<String>, LedgerError> {
    let Some(code) = raw.map(str::trim).filter(|c| !c.is_empty()) else {
        return Ok(None);
    };

    if code.chars().count() > MAX_CODE_LEN {
        return Err(LedgerError::invalid(format!(
            "{field} cannot exceed {MAX_CODE_LEN} characters"
        )));
    }

    Ok(Some(code.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("50", dec!(50))]
    #[case(" 49.99 ", dec!(49.99))]
    #[case("50.000", dec!(50))]
    #[case("1e3", dec!(1000))]
    #[case("0.01", dec!(0.01))]
    fn test_parse_amount_accepts(#[case] raw: &str, #[case] expected: Decimal) {
        assert_eq!(parse_amount(raw, "Amount").unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("abc")]
    #[case("NaN")]
    #[case("0")]
    #[case("-5")]
    #[case("0.001")]
    #[case("1000000000000")]
    fn test_parse_amount_rejects(#[case] raw: &str) {
        assert!(matches!(
            parse_amount(raw, "Amount"),
            Err(LedgerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_max_amount_is_storage_bound() {
        assert_eq!(MAX_AMOUNT, dec!(999999999999.99));
        assert!(validate_amount(MAX_AMOUNT, "Amount").is_ok());
    }

    #[test]
    fn test_error_names_the_field() {
        let err = parse_amount("-1", "Minimum balance").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid argument: Minimum balance must be greater than zero"
        );
    }

    #[test]
    fn test_validate_type() {
        assert_eq!(validate_type("  topup ").unwrap(), "topup");
        assert!(validate_type("").is_err());
        assert!(validate_type("   ").is_err());
        assert!(validate_type(&"x".repeat(MAX_TYPE_LEN + 1)).is_err());
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code(None, "Promo code").unwrap(), None);
        assert_eq!(normalize_code(Some("  "), "Promo code").unwrap(), None);
        assert_eq!(
            normalize_code(Some(" SAVE10 "), "Promo code").unwrap(),
            Some("SAVE10".to_string())
        );
        assert!(normalize_code(Some(&"C".repeat(MAX_CODE_LEN + 1)), "Voucher code").is_err());
    }
}
