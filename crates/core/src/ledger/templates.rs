//! Text for the expense and notification rows written alongside ledger changes.

use gridx_shared::types::{Currency, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::auto_topup::Frequency;

/// Type tag stored on the expense row that mirrors a top-up.
pub const TOP_UP_EXPENSE_TYPE: &str = "top_up";

/// Severity tag stored on a notification, used by clients to pick a style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Neutral information.
    Info,
    /// A completed action.
    Success,
    /// Something needs attention.
    Warning,
    /// A failed action.
    Error,
}

impl NotificationKind {
    /// Returns the stored tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Severity tag.
    pub kind: NotificationKind,
}

/// Human readable purpose for the expense row of a top-up.
#[must_use]
pub fn expense_purpose(top_up_type: &str) -> String {
    format!("{top_up_type} - Energy Credit")
}

/// Notification written after a successful top-up.
#[must_use]
pub fn top_up_succeeded(
    amount: Decimal,
    new_balance: Decimal,
    currency: Currency,
) -> NotificationDraft {
    NotificationDraft {
        title: "Top-Up Successful".to_string(),
        message: format!(
            "Your top-up of {} was successful. New balance: {}.",
            Money::new(amount, currency),
            Money::new(new_balance, currency),
        ),
        kind: NotificationKind::Success,
    }
}

/// Notification written when auto top-up settings are saved.
#[must_use]
pub fn auto_top_up_saved(
    min_balance: Decimal,
    top_up_amount: Decimal,
    frequency: Frequency,
    currency: Currency,
) -> NotificationDraft {
    NotificationDraft {
        title: "Auto Top-Up Enabled".to_string(),
        message: format!(
            "Your account will be topped up with {} when your balance falls below {} (checked {frequency}).",
            Money::new(top_up_amount, currency),
            Money::new(min_balance, currency),
        ),
        kind: NotificationKind::Info,
    }
}

/// Notification written when auto top-up is switched on or off.
#[must_use]
pub fn auto_top_up_toggled(enabled: bool) -> NotificationDraft {
    if enabled {
        NotificationDraft {
            title: "Auto Top-Up Enabled".to_string(),
            message: "Auto top-up has been turned on.".to_string(),
            kind: NotificationKind::Info,
        }
    } else {
        NotificationDraft {
            title: "Auto Top-Up Disabled".to_string(),
            message: "Auto top-up has been turned off. \
                      Your balance will no longer be topped up automatically."
                .to_string(),
            kind: NotificationKind::Warning,
        }
    }
}
