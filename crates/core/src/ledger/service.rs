//! Ledger service for top-up planning.
//!
//! Storage runs the plan inside one database transaction; this service only
//! decides what gets written.

use chrono::{DateTime, Utc};
use gridx_shared::types::{Currency, ExpenseId, NotificationId, TopUpId};
use rust_decimal::Decimal;

use super::templates::{self, NotificationDraft, TOP_UP_EXPENSE_TYPE};
use super::types::{TopUpReceipt, TopUpRequest};

/// Everything needed to persist one top-up, minus the resulting balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopUpPlan {
    /// Validated request.
    pub request: TopUpRequest,
    /// Id for the ledger entry.
    pub top_up_id: TopUpId,
    /// Id for the expense record.
    pub expense_id: ExpenseId,
    /// Id for the notification.
    pub notification_id: NotificationId,
    /// Purpose text of the expense record.
    pub expense_purpose: String,
    /// Type tag of the expense record.
    pub expense_type: &'static str,
    /// Timestamp applied to every row.
    pub created_at: DateTime<Utc>,
}

/// Ledger service for business logic.
pub struct LedgerService;

impl LedgerService {
    /// Allocates ids and derived text for a validated top-up.
    #[must_use]
    pub fn plan_top_up(request: TopUpRequest, now: DateTime<Utc>) -> TopUpPlan {
        let expense_purpose = templates::expense_purpose(request.top_up_type());
        TopUpPlan {
            request,
            top_up_id: TopUpId::new(),
            expense_id: ExpenseId::new(),
            notification_id: NotificationId::new(),
            expense_purpose,
            expense_type: TOP_UP_EXPENSE_TYPE,
            created_at: now,
        }
    }

    /// Success notification for a plan once the new balance is known.
    #[must_use]
    pub fn success_notification(
        plan: &TopUpPlan,
        new_balance: Decimal,
        currency: Currency,
    ) -> NotificationDraft {
        templates::top_up_succeeded(plan.request.amount(), new_balance, currency)
    }

    /// Builds the receipt returned to the caller after commit.
    #[must_use]
    pub fn receipt(plan: &TopUpPlan, new_balance: Decimal) -> TopUpReceipt {
        TopUpReceipt {
            top_up_id: plan.top_up_id,
            expense_id: plan.expense_id,
            notification_id: plan.notification_id,
            user_id: plan.request.user_id(),
            amount: plan.request.amount(),
            new_balance,
            created_at: plan.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridx_shared::types::UserId;
    use rust_decimal_macros::dec;

    fn request(amount: Decimal) -> TopUpRequest {
        TopUpRequest::new(UserId::new(), amount, "topup", Some("PROMO"), None).unwrap()
    }

    #[test]
    fn test_plan_derives_expense_fields() {
        let plan = LedgerService::plan_top_up(request(dec!(200)), Utc::now());

        assert_eq!(plan.expense_purpose, "topup - Energy Credit");
        assert_eq!(plan.expense_type, "top_up");
        assert_eq!(plan.request.promo_code(), Some("PROMO"));
    }

    #[test]
    fn test_plans_get_fresh_ids() {
        let now = Utc::now();
        let a = LedgerService::plan_top_up(request(dec!(1)), now);
        let b = LedgerService::plan_top_up(request(dec!(1)), now);

        assert_ne!(a.top_up_id, b.top_up_id);
        assert_ne!(a.expense_id, b.expense_id);
        assert_ne!(a.notification_id, b.notification_id);
    }

    #[test]
    fn test_receipt_correlates_with_plan() {
        let plan = LedgerService::plan_top_up(request(dec!(50)), Utc::now());
        let receipt = LedgerService::receipt(&plan, dec!(150));

        assert_eq!(receipt.top_up_id, plan.top_up_id);
        assert_eq!(receipt.expense_id, plan.expense_id);
        assert_eq!(receipt.notification_id, plan.notification_id);
        assert_eq!(receipt.user_id, plan.request.user_id());
        assert_eq!(receipt.amount, dec!(50));
        assert_eq!(receipt.new_balance, dec!(150));
        assert_eq!(receipt.created_at, plan.created_at);
    }

    #[test]
    fn test_success_notification_uses_new_balance() {
        let plan = LedgerService::plan_top_up(request(dec!(50)), Utc::now());
        let draft = LedgerService::success_notification(&plan, dec!(150), Currency::Zar);

        assert!(draft.message.contains("R150.00"));
    }
}
