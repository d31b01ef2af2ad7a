//! Auto top-up settings repository.
//!
//! Settings are stored one row per user. Saving always (re-)enables auto
//! top-up; toggling only flips the flag of an existing row. Both writes
//! append a notification in the same transaction.

use std::time::Duration;

use chrono::Utc;
use gridx_core::auto_topup::{AutoTopUpSettings, SettingsInput};
use gridx_core::ledger::LedgerError;
use gridx_core::ledger::templates;
use gridx_shared::types::{Currency, NotificationId, UserId};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, TransactionTrait};
use tracing::{error, info, instrument};
use uuid::Uuid;

use super::notification::insert_notification;
use super::{DEFAULT_OPERATION_TIMEOUT, bounded, ensure_user, storage_error};
use crate::entities::auto_top_up_settings;

/// Auto top-up settings repository.
#[derive(Debug, Clone)]
pub struct AutoTopUpRepository {
    db: DatabaseConnection,
    timeout: Duration,
    currency: Currency,
}

impl AutoTopUpRepository {
    /// Creates a new auto top-up settings repository.
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

    /// Creates or replaces the user's settings and enables auto top-up.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the user does not exist.
    /// - `StorageUnavailable` / `TransactionFailed` on storage failure, in
    ///   which case neither the settings nor the notification were written.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn save_settings(
        &self,
        user_id: UserId,
        input: SettingsInput,
    ) -> Result<AutoTopUpSettings, LedgerError> {
        let result = bounded(self.timeout, "save_auto_top_up_settings", async {
            let txn = self.db.begin().await.map_err(storage_error)?;
            let now: DateTimeWithTimeZone = Utc::now().into();

            ensure_user(&txn, user_id).await?;

            let row = auto_top_up_settings::ActiveModel {
                id: Set(Uuid::now_v7()),
                user_id: Set(user_id.into_inner()),
                min_balance: Set(input.min_balance()),
                top_up_amount: Set(input.top_up_amount()),
                frequency: Set(input.frequency().into()),
                is_enabled: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
            };

            auto_top_up_settings::Entity::insert(row)
                .on_conflict(
                    OnConflict::column(auto_top_up_settings::Column::UserId)
                        .update_columns([
                            auto_top_up_settings::Column::MinBalance,
                            auto_top_up_settings::Column::TopUpAmount,
                            auto_top_up_settings::Column::Frequency,
                            auto_top_up_settings::Column::IsEnabled,
                            auto_top_up_settings::Column::UpdatedAt,
                        ])
                        .to_owned(),
                )
                .exec_without_returning(&txn)
                .await
                .map_err(storage_error)?;

            let saved = auto_top_up_settings::Entity::find()
                .filter(auto_top_up_settings::Column::UserId.eq(user_id.into_inner()))
                .one(&txn)
                .await
                .map_err(storage_error)?
                .ok_or_else(|| {
                    LedgerError::TransactionFailed("settings row missing after upsert".to_string())
                })?;

            let draft = templates::auto_top_up_saved(
                input.min_balance(),
                input.top_up_amount(),
                input.frequency(),
                self.currency,
            );
            insert_notification(&txn, NotificationId::new(), user_id, draft, now).await?;

            txn.commit().await.map_err(storage_error)?;
            Ok(to_settings(saved))
        })
        .await;

        match &result {
            Ok(settings) => info!(frequency = %settings.frequency, "Auto top-up settings saved"),
            Err(e) => error!(
                error = %e,
                operation = "save_auto_top_up_settings",
                "Saving settings failed"
            ),
        }
        result
    }

    /// Returns the user's settings, if any were ever saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or times out.
    pub async fn get_settings(
        &self,
        user_id: UserId,
    ) -> Result<Option<AutoTopUpSettings>, LedgerError> {
        bounded(self.timeout, "get_auto_top_up_settings", async {
            let row = auto_top_up_settings::Entity::find()
                .filter(auto_top_up_settings::Column::UserId.eq(user_id.into_inner()))
                .one(&self.db)
                .await
                .map_err(storage_error)?;
            Ok(row.map(to_settings))
        })
        .await
    }

    /// Switches auto top-up on or off for a user that already has settings.
    ///
    /// Returns false, and writes nothing, when the user has no settings row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails or times out.
    #[instrument(skip_all, fields(user_id = %user_id, enabled = enabled))]
    pub async fn toggle_enabled(
        &self,
        user_id: UserId,
        enabled: bool,
    ) -> Result<bool, LedgerError> {
        let result = bounded(self.timeout, "toggle_auto_top_up", async {
            let txn = self.db.begin().await.map_err(storage_error)?;
            let now: DateTimeWithTimeZone = Utc::now().into();

            let updated = auto_top_up_settings::Entity::update_many()
                .col_expr(auto_top_up_settings::Column::IsEnabled, Expr::value(enabled))
                .col_expr(auto_top_up_settings::Column::UpdatedAt, Expr::value(now))
                .filter(auto_top_up_settings::Column::UserId.eq(user_id.into_inner()))
                .exec(&txn)
                .await
                .map_err(storage_error)?;

            if updated.rows_affected == 0 {
                return Ok(false);
            }

            let draft = templates::auto_top_up_toggled(enabled);
            insert_notification(&txn, NotificationId::new(), user_id, draft, now).await?;

            txn.commit().await.map_err(storage_error)?;
            Ok(true)
        })
        .await;

        match &result {
            Ok(true) => info!("Auto top-up toggled"),
            Ok(false) => info!("No auto top-up settings to toggle"),
            Err(e) => error!(error = %e, operation = "toggle_auto_top_up", "Toggle failed"),
        }
        result
    }
}

fn to_settings(model: auto_top_up_settings::Model) -> AutoTopUpSettings {
    AutoTopUpSettings {
        user_id: UserId::from_uuid(model.user_id),
        min_balance: model.min_balance,
        top_up_amount: model.top_up_amount,
        frequency: model.frequency.into(),
        is_enabled: model.is_enabled,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
