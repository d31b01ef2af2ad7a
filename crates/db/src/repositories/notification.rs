//! Notification repository: inbox reads plus the append used by ledger writes.

use std::time::Duration;

use gridx_core::ledger::{LedgerError, NotificationDraft};
use gridx_shared::types::{NotificationId, PageRequest, PageResponse, UserId};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::{DEFAULT_OPERATION_TIMEOUT, bounded, storage_error};
use crate::entities::notifications;

/// Appends a notification on the given connection or transaction.
pub(crate) async fn insert_notification<C: ConnectionTrait>(
    conn: &C,
    id: NotificationId,
    user_id: UserId,
    draft: NotificationDraft,
    created_at: DateTimeWithTimeZone,
) -> Result<notifications::Model, LedgerError> {
    notifications::ActiveModel {
        id: Set(id.into_inner()),
        user_id: Set(user_id.into_inner()),
        title: Set(draft.title),
        message: Set(draft.message),
        notification_type: Set(draft.kind.as_str().to_string()),
        is_read: Set(false),
        created_at: Set(created_at),
    }
    .insert(conn)
    .await
    .map_err(storage_error)
}

/// Notification repository.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    db: DatabaseConnection,
    timeout: Duration,
}

impl NotificationRepository {
    /// Creates a new notification repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    /// Overrides the per-operation timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Lists a user's notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or times out.
    pub async fn list(
        &self,
        user_id: UserId,
        unread_only: bool,
        page: &PageRequest,
    ) -> Result<PageResponse<notifications::Model>, LedgerError> {
        let page = page.normalized();
        bounded(self.timeout, "list_notifications", async {
            let mut query = notifications::Entity::find()
                .filter(notifications::Column::UserId.eq(user_id.into_inner()));
            if unread_only {
                query = query.filter(notifications::Column::IsRead.eq(false));
            }

            let total = query.clone().count(&self.db).await.map_err(storage_error)?;
            let rows = query
                .order_by_desc(notifications::Column::CreatedAt)
                .order_by_desc(notifications::Column::Id)
                .offset(page.offset())
                .limit(page.limit())
                .all(&self.db)
                .await
                .map_err(storage_error)?;

            Ok(PageResponse::new(rows, page.page, page.per_page, total))
        })
        .await
    }

    /// Counts a user's unread notifications.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or times out.
    pub async fn unread_count(&self, user_id: UserId) -> Result<u64, LedgerError> {
        bounded(self.timeout, "count_unread_notifications", async {
            notifications::Entity::find()
                .filter(notifications::Column::UserId.eq(user_id.into_inner()))
                .filter(notifications::Column::IsRead.eq(false))
                .count(&self.db)
                .await
                .map_err(storage_error)
        })
        .await
    }

    /// Marks one of the user's notifications as read.
    ///
    /// Returns false if no such notification belongs to the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails or times out.
    pub async fn mark_read(
        &self,
        user_id: UserId,
        notification_id: NotificationId,
    ) -> Result<bool, LedgerError> {
        bounded(self.timeout, "mark_notification_read", async {
            let result = notifications::Entity::update_many()
                .col_expr(notifications::Column::IsRead, Expr::value(true))
                .filter(notifications::Column::Id.eq(notification_id.into_inner()))
                .filter(notifications::Column::UserId.eq(user_id.into_inner()))
                .exec(&self.db)
                .await
                .map_err(storage_error)?;

            Ok(result.rows_affected > 0)
        })
        .await
    }
}
