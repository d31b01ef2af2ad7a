//! Top-up repository: the atomic credit path and balance reads.
//!
//! A top-up writes four things in one transaction: the ledger row, a
//! correlated expense, the balance increment and the success notification.
//! The increment is a single `INSERT .. ON CONFLICT DO UPDATE` so concurrent
//! top-ups for the same user serialize on the balance row instead of racing
//! through a read-modify-write.

use std::time::Duration;

use chrono::Utc;
use gridx_core::ledger::{LedgerError, LedgerService, TopUpPlan, TopUpReceipt, TopUpRequest};
use gridx_shared::types::{Currency, PageRequest, PageResponse, UserId};
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{error, info, instrument};

use super::notification::insert_notification;
use super::{DEFAULT_OPERATION_TIMEOUT, bounded, ensure_user, storage_error};
use crate::entities::{expenses, top_ups, user_balances};

/// Top-up repository.
#[derive(Debug, Clone)]
pub struct TopUpRepository {
    db: DatabaseConnection,
    timeout: Duration,
    currency: Currency,
}

impl TopUpRepository {
    /// Creates a new top-up repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            timeout: DEFAULT_OPERATION_TIMEOUT,
            currency: Currency::default(),
        }
    }

    /// Overrides the per-operation timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the currency used in notification text.
    #[must_use]
    pub const fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Credits a validated top-up to the user's balance.
    ///
    /// Either all four writes commit or none do. The receipt carries the
    /// balance read back inside the transaction, so it reflects this top-up
    /// and every one committed before it.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the user does not exist.
    /// - `StorageUnavailable` if the pool is unreachable or the operation
    ///   timed out. The write may or may not have committed.
    /// - `TransactionFailed` if any statement failed; nothing was written.
    #[instrument(
        skip_all,
        fields(user_id = %request.user_id(), amount = %request.amount())
    )]
    pub async fn process_top_up(&self, request: TopUpRequest) -> Result<TopUpReceipt, LedgerError> {
        let plan = LedgerService::plan_top_up(request, Utc::now());

        match bounded(self.timeout, "process_top_up", self.apply(&plan)).await {
            Ok(new_balance) => {
                info!(
                    top_up_id = %plan.top_up_id,
                    new_balance = %new_balance,
                    "Top-up committed"
                );
                Ok(LedgerService::receipt(&plan, new_balance))
            }
            Err(e) => {
                error!(error = %e, operation = "process_top_up", "Top-up failed");
                Err(e)
            }
        }
    }

    async fn apply(&self, plan: &TopUpPlan) -> Result<Decimal, LedgerError> {
        let txn = self.db.begin().await.map_err(storage_error)?;
        let user_id = plan.request.user_id();
        let amount = plan.request.amount();
        let now: DateTimeWithTimeZone = plan.created_at.into();

        ensure_user(&txn, user_id).await?;

        top_ups::ActiveModel {
            id: Set(plan.top_up_id.into_inner()),
            user_id: Set(user_id.into_inner()),
            amount: Set(amount),
            top_up_type: Set(plan.request.top_up_type().to_string()),
            promo_code: Set(plan.request.promo_code().map(str::to_string)),
            voucher_code: Set(plan.request.voucher_code().map(str::to_string)),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(storage_error)?;

        expenses::ActiveModel {
            id: Set(plan.expense_id.into_inner()),
            user_id: Set(user_id.into_inner()),
            top_up_id: Set(Some(plan.top_up_id.into_inner())),
            amount: Set(amount),
            purpose: Set(plan.expense_purpose.clone()),
            expense_type: Set(plan.expense_type.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(storage_error)?;

        let new_balance = credit_balance(&txn, user_id, amount, now).await?;

        let draft = LedgerService::success_notification(plan, new_balance, self.currency);
        insert_notification(&txn, plan.notification_id, user_id, draft, now).await?;

        txn.commit().await.map_err(storage_error)?;
        Ok(new_balance)
    }

    /// Returns the user's current balance, zero if they never topped up.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or times out.
    pub async fn get_balance(&self, user_id: UserId) -> Result<Decimal, LedgerError> {
        bounded(self.timeout, "get_balance", async {
            let row = user_balances::Entity::find_by_id(user_id.into_inner())
                .one(&self.db)
                .await
                .map_err(storage_error)?;
            Ok(row.map_or(Decimal::ZERO, |b| b.balance))
        })
        .await
    }

    /// Lists a user's top-ups, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or times out.
    pub async fn list_top_ups(
        &self,
        user_id: UserId,
        page: &PageRequest,
    ) -> Result<PageResponse<top_ups::Model>, LedgerError> {
        let page = page.normalized();
        bounded(self.timeout, "list_top_ups", async {
            let query =
                top_ups::Entity::find().filter(top_ups::Column::UserId.eq(user_id.into_inner()));

            let total = query.clone().count(&self.db).await.map_err(storage_error)?;
            let rows = query
                .order_by_desc(top_ups::Column::CreatedAt)
                .order_by_desc(top_ups::Column::Id)
                .offset(page.offset())
                .limit(page.limit())
                .all(&self.db)
                .await
                .map_err(storage_error)?;

            Ok(PageResponse::new(rows, page.page, page.per_page, total))
        })
        .await
    }
}

/// Adds `amount` to the user's balance row, creating it on first use, and
/// returns the balance as seen by this transaction.
async fn credit_balance<C: ConnectionTrait>(
    conn: &C,
    user_id: UserId,
    amount: Decimal,
    now: DateTimeWithTimeZone,
) -> Result<Decimal, LedgerError> {
    let row = user_balances::ActiveModel {
        user_id: Set(user_id.into_inner()),
        balance: Set(amount),
        updated_at: Set(now),
    };

    user_balances::Entity::insert(row)
        .on_conflict(
            OnConflict::column(user_balances::Column::UserId)
                .value(
                    user_balances::Column::Balance,
                    Expr::col((user_balances::Entity, user_balances::Column::Balance))
                        .add(Expr::cust("excluded.balance")),
                )
                .update_column(user_balances::Column::UpdatedAt)
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await
        .map_err(storage_error)?;

    user_balances::Entity::find_by_id(user_id.into_inner())
        .one(conn)
        .await
        .map_err(storage_error)?
        .map(|b| b.balance)
        .ok_or_else(|| {
            LedgerError::TransactionFailed("balance row missing after upsert".to_string())
        })
}
