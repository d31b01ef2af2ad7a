//! Validation for auto top-up settings input.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::types::Frequency;
use crate::ledger::LedgerError;
use crate::ledger::validation::{parse_amount, validate_amount};

/// Validated input for saving auto top-up settings.
///
/// Both amounts are strictly positive and the frequency is one of the
/// enumerated values. Saving always enables auto top-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsInput {
    min_balance: Decimal,
    top_up_amount: Decimal,
    frequency: Frequency,
}

impl SettingsInput {
    /// Validates numeric input.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidArgument` if an amount is not strictly
    /// positive or the frequency is not recognised.
    pub fn new(
        min_balance: Decimal,
        top_up_amount: Decimal,
        frequency: &str,
    ) -> Result<Self, LedgerError> {
        Ok(Self {
            min_balance: validate_amount(min_balance, "Minimum balance")?,
            top_up_amount: validate_amount(top_up_amount, "Auto top-up amount")?,
            frequency: Frequency::from_str(frequency)?,
        })
    }

    /// Validates textual input as it arrives from clients.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidArgument` on any invalid field.
    pub fn parse(
        min_balance: &str,
        top_up_amount: &str,
        frequency: &str,
    ) -> Result<Self, LedgerError> {
        Ok(Self {
            min_balance: parse_amount(min_balance, "Minimum balance")?,
            top_up_amount: parse_amount(top_up_amount, "Auto top-up amount")?,
            frequency: Frequency::from_str(frequency)?,
        })
    }

    /// Balance threshold.
    #[must_use]
    pub const fn min_balance(&self) -> Decimal {
        self.min_balance
    }

    /// Amount per automatic top-up.
    #[must_use]
    pub const fn top_up_amount(&self) -> Decimal {
        self.top_up_amount
    }

    /// Check frequency.
    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        self.frequency
    }
}
